//! Brand and model vocabulary used to tag listing titles.
//!
//! Terms and titles are split into lowercase alphanumeric tokens. A term
//! matches when all of its tokens appear contiguously in the title, so
//! "M6" matches "TaylorMade M6 Driver" but not "M60". When several terms
//! match, the longest wins and ties resolve lexicographically.

use std::collections::BTreeMap;

use crate::domain::rule::tokenize;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Term {
    display: String,
    tokens: Vec<String>,
}

impl Term {
    fn matches(&self, title: &[String]) -> bool {
        title
            .windows(self.tokens.len())
            .any(|window| window == self.tokens.as_slice())
    }
}

/// Keyed by [`term_key`](crate::domain::rule::term_key), the form rules are
/// indexed by, so an extracted term always finds its rule.
type TermTable = BTreeMap<String, Term>;

fn insert_term(table: &mut TermTable, display: &str) {
    let tokens = tokenize(display);
    if tokens.is_empty() {
        return;
    }
    table.entry(tokens.join(" ")).or_insert_with(|| Term {
        display: display.trim().to_string(),
        tokens,
    });
}

fn best_match<'a>(table: &'a TermTable, title: &[String]) -> Option<&'a str> {
    table
        .iter()
        .filter(|(_, term)| term.matches(title))
        // BTreeMap iterates keys in order, so keeping the first longest key
        // yields the lexicographic tie-break.
        .fold(None::<(&String, &Term)>, |best, candidate| match best {
            Some(current) if current.0.len() >= candidate.0.len() => Some(current),
            _ => Some(candidate),
        })
        .map(|(_, term)| term.display.as_str())
}

/// Brand and model terms for title extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    brands: TermTable,
    models: TermTable,
}

impl Vocabulary {
    pub fn new<B, M>(brands: B, models: M) -> Self
    where
        B: IntoIterator,
        B::Item: AsRef<str>,
        M: IntoIterator,
        M::Item: AsRef<str>,
    {
        Self::default().with_brands(brands).with_models(models)
    }

    #[must_use]
    pub fn with_brands<I>(mut self, brands: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for brand in brands {
            insert_term(&mut self.brands, brand.as_ref());
        }
        self
    }

    #[must_use]
    pub fn with_models<I>(mut self, models: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for model in models {
            insert_term(&mut self.models, model.as_ref());
        }
        self
    }

    #[must_use]
    pub fn extract_brand(&self, title: &str) -> Option<&str> {
        best_match(&self.brands, &tokenize(title))
    }

    #[must_use]
    pub fn extract_model(&self, title: &str) -> Option<&str> {
        best_match(&self.models, &tokenize(title))
    }

    #[must_use]
    pub fn brand_count(&self) -> usize {
        self.brands.len()
    }

    #[must_use]
    pub fn model_count(&self) -> usize {
        self.models.len()
    }
}
