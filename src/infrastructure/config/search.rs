//! Search terms shared by every marketplace.

use serde::Deserialize;

use crate::port::outbound::source::SearchQuery;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    /// Marketplace category ids; empty lets each source use its own.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Base currency; listings in any other currency are dropped.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_keywords() -> Vec<String> {
    vec!["golf club".into()]
}

fn default_currency() -> String {
    "GBP".into()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            categories: Vec::new(),
            currency: default_currency(),
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub fn query(&self) -> SearchQuery {
        SearchQuery::new(self.keywords.clone()).with_categories(self.categories.clone())
    }
}
