//! Marketplace listing sources.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::id::Source;
use crate::domain::listing::RawListing;
use crate::error::FetchError;

/// What to search for on every marketplace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free-text search terms, joined with spaces.
    pub keywords: Vec<String>,
    /// Marketplace-specific category identifiers.
    pub categories: Vec<String>,
}

impl SearchQuery {
    pub fn new(keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            categories: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Keywords as a single query string.
    #[must_use]
    pub fn text(&self) -> String {
        self.keywords.join(" ")
    }
}

/// Fetches raw listings from one marketplace.
///
/// Implementations own authentication and pagination but never retry;
/// the scheduler decides whether a failed fetch is worth repeating.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Run one search and return every listing found, unparsed.
    async fn fetch_listings(&self, query: &SearchQuery) -> Result<Vec<RawListing>, FetchError>;

    /// Which marketplace this adapter talks to.
    fn source(&self) -> Source;
}

/// Configuration-driven set of enabled sources.
#[derive(Default, Clone)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn ListingSource>>,
}

impl SourceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, source: Arc<dyn ListingSource>) {
        self.sources.push(source);
    }

    #[must_use]
    pub fn sources(&self) -> &[Arc<dyn ListingSource>] {
        &self.sources
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
