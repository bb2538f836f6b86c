//! Rule engine and vocabulary bundled for one cycle, plus the shared handle
//! used to swap them between cycles.

use std::sync::Arc;

use parking_lot::RwLock;

use super::engine::RuleEngine;
use crate::application::normalize::Vocabulary;
use crate::error::Result;

/// Everything needed to tag and score listings.
#[derive(Debug, Clone)]
pub struct RuleBook {
    pub engine: RuleEngine,
    pub vocabulary: Vocabulary,
}

impl RuleBook {
    /// Bundle an engine with its vocabulary.
    ///
    /// Every brand and model named by a rule is added to `vocabulary`.
    #[must_use]
    pub fn new(engine: RuleEngine, vocabulary: Vocabulary) -> Self {
        let rules = engine.rules();
        let vocabulary = vocabulary
            .with_brands(rules.brand_values())
            .with_models(rules.model_values());
        Self { engine, vocabulary }
    }
}

/// Reloadable origin of rule books, such as a rules file on disk.
pub trait RuleSource: Send + Sync {
    /// Return a new rule book if the underlying definition changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the changed definition is unreadable or invalid.
    fn reload_if_changed(&self) -> Result<Option<RuleBook>>;
}

/// Rule book shared between the scheduler and on-demand callers.
///
/// Readers take an `Arc` snapshot that stays fixed for as long as they hold
/// it; [`SharedRuleBook::replace`] only affects later snapshots.
#[derive(Debug, Clone)]
pub struct SharedRuleBook {
    inner: Arc<RwLock<Arc<RuleBook>>>,
}

impl SharedRuleBook {
    #[must_use]
    pub fn new(book: RuleBook) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(book))),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<RuleBook> {
        Arc::clone(&self.inner.read())
    }

    pub fn replace(&self, book: RuleBook) {
        *self.inner.write() = Arc::new(book);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::rules::RiskPolicy;
    use crate::domain::rule::{ResaleValue, Rule, RuleSet};
    use rust_decimal_macros::dec;

    fn book(default_multiplier: rust_decimal::Decimal) -> RuleBook {
        let rules = RuleSet::new(vec![
            Rule::default_multiplier(default_multiplier),
            Rule::brand("Ping", ResaleValue::Multiplier(dec!(1.4))),
            Rule::model("Scotty Cameron Newport", ResaleValue::Fixed(dec!(220))),
        ])
        .unwrap();
        RuleBook::new(RuleEngine::new(rules, RiskPolicy::default()), Vocabulary::default())
    }

    #[test]
    fn rule_values_join_the_vocabulary() {
        let book = book(dec!(1.5));
        assert_eq!(book.vocabulary.extract_brand("PING anser putter"), Some("Ping"));
        assert_eq!(
            book.vocabulary.extract_model("scotty cameron newport 2"),
            Some("Scotty Cameron Newport")
        );
    }

    #[test]
    fn vocabulary_spelling_still_reaches_the_rule() {
        let rules = RuleSet::new(vec![
            Rule::default_multiplier(dec!(1.5)),
            Rule::model("TaylorMade-M6", ResaleValue::Fixed(dec!(150))),
        ])
        .unwrap();
        let book = RuleBook::new(
            RuleEngine::new(rules, RiskPolicy::default()),
            Vocabulary::new(Vec::<&str>::new(), ["TaylorMade M6"]),
        );

        let extracted = book.vocabulary.extract_model("TaylorMade M6 Driver 10.5");
        assert_eq!(extracted, Some("TaylorMade M6"));
        let rule = book.engine.rules().resolve(extracted, None);
        assert_eq!(rule.kind, crate::domain::rule::MatchKind::Model);
        assert_eq!(rule.resale, ResaleValue::Fixed(dec!(150)));
    }

    #[test]
    fn snapshots_survive_replacement() {
        let shared = SharedRuleBook::new(book(dec!(1.5)));
        let before = shared.snapshot();

        shared.replace(book(dec!(2)));

        let after = shared.snapshot();
        assert_eq!(
            before.engine.rules().default_rule().resale,
            ResaleValue::Multiplier(dec!(1.5))
        );
        assert_eq!(
            after.engine.rules().default_rule().resale,
            ResaleValue::Multiplier(dec!(2))
        );
    }
}
