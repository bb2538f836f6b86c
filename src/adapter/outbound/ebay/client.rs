//! eBay Browse API search client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::debug;

use super::dto::SearchResponse;
use super::settings::EbayConfig;
use crate::adapter::outbound::http::{build_client, read_json};
use crate::domain::id::Source;
use crate::domain::listing::RawListing;
use crate::error::FetchError;
use crate::port::outbound::source::{ListingSource, SearchQuery};
use crate::port::outbound::token::TokenProvider;

const SEARCH_PATH: &str = "/buy/browse/v1/item_summary/search";

/// Newest-first keyword search over the Browse API.
///
/// Pages with `offset` until the response has no `next` link or
/// `max_pages` is reached.
pub struct EbayClient {
    http: HttpClient,
    config: EbayConfig,
    tokens: Arc<dyn TokenProvider>,
}

impl EbayClient {
    #[must_use]
    pub fn new(config: EbayConfig, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            http: build_client(config.timeout_ms, config.connect_timeout_ms, None),
            config,
            tokens,
        }
    }

    fn search_url(&self) -> String {
        format!("{}{SEARCH_PATH}", self.config.api_url.trim_end_matches('/'))
    }

    fn categories<'a>(&'a self, query: &'a SearchQuery) -> &'a [String] {
        if query.categories.is_empty() {
            &self.config.category_ids
        } else {
            &query.categories
        }
    }

    async fn fetch_page(
        &self,
        token: &str,
        query: &SearchQuery,
        offset: u32,
    ) -> Result<SearchResponse, FetchError> {
        let mut params = vec![
            ("q", query.text()),
            ("limit", self.config.page_size.to_string()),
            ("offset", offset.to_string()),
            ("sort", "newlyListed".to_string()),
        ];
        let categories = self.categories(query);
        if !categories.is_empty() {
            params.push(("category_ids", categories.join(",")));
        }

        let response = self
            .http
            .get(self.search_url())
            .query(&params)
            .bearer_auth(token)
            .header("X-EBAY-C-MARKETPLACE-ID", &self.config.marketplace)
            .send()
            .await?;
        read_json(response).await
    }
}

#[async_trait]
impl ListingSource for EbayClient {
    async fn fetch_listings(&self, query: &SearchQuery) -> Result<Vec<RawListing>, FetchError> {
        let token = self.tokens.access_token().await?;
        let page_size = self.config.page_size.max(1);
        let mut listings = Vec::new();

        for page in 0..self.config.max_pages.max(1) {
            let offset = page * page_size;
            let response = self.fetch_page(&token, query, offset).await?;
            let count = response.item_summaries.len();
            debug!(page, offset, count, total = ?response.total, "eBay page fetched");

            listings.extend(response.item_summaries.into_iter().map(RawListing::from));
            if response.next.is_none() || count < page_size as usize {
                break;
            }
        }

        Ok(listings)
    }

    fn source(&self) -> Source {
        Source::Ebay
    }
}
