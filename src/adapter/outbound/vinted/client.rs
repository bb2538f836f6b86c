//! Vinted catalog search client.
//!
//! Vinted has no public API; this uses the JSON endpoint behind its web
//! catalog. A session cookie is sent when one is configured.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, COOKIE};
use reqwest::Client as HttpClient;
use tracing::debug;
use url::Url;

use super::dto::CatalogResponse;
use super::settings::VintedConfig;
use crate::adapter::outbound::http::{build_client, read_json};
use crate::domain::id::Source;
use crate::domain::listing::RawListing;
use crate::error::{ConfigError, FetchError, Result};
use crate::port::outbound::source::{ListingSource, SearchQuery};
use crate::port::outbound::token::TokenProvider;

const CATALOG_PATH: &str = "/api/v2/catalog/items";

pub struct VintedClient {
    http: HttpClient,
    base_url: Url,
    config: VintedConfig,
    cookie: Option<Arc<dyn TokenProvider>>,
}

impl VintedClient {
    /// # Errors
    ///
    /// Returns a configuration error if `base_url` is not a valid URL.
    pub fn new(config: VintedConfig, cookie: Option<Arc<dyn TokenProvider>>) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "sources.vinted.base_url",
            reason: e.to_string(),
        })?;
        Ok(Self {
            http: build_client(
                config.timeout_ms,
                config.connect_timeout_ms,
                Some(&config.user_agent),
            ),
            base_url,
            config,
            cookie,
        })
    }

    fn catalog_url(&self) -> String {
        format!("{}{CATALOG_PATH}", self.config.base_url.trim_end_matches('/'))
    }

    fn catalogs<'a>(&'a self, query: &'a SearchQuery) -> &'a [String] {
        if query.categories.is_empty() {
            &self.config.catalog_ids
        } else {
            &query.categories
        }
    }

    async fn fetch_page(
        &self,
        cookie: Option<&str>,
        query: &SearchQuery,
        page: u32,
    ) -> std::result::Result<CatalogResponse, FetchError> {
        let mut params = vec![
            ("search_text", query.text()),
            ("per_page", self.config.page_size.to_string()),
            ("page", page.to_string()),
            ("order", "newest_first".to_string()),
        ];
        let catalogs = self.catalogs(query);
        if !catalogs.is_empty() {
            params.push(("catalog_ids", catalogs.join(",")));
        }

        let mut request = self
            .http
            .get(self.catalog_url())
            .query(&params)
            .header(ACCEPT, "application/json, text/plain, */*");
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        read_json(request.send().await?).await
    }
}

#[async_trait]
impl ListingSource for VintedClient {
    async fn fetch_listings(
        &self,
        query: &SearchQuery,
    ) -> std::result::Result<Vec<RawListing>, FetchError> {
        let cookie = match &self.cookie {
            Some(provider) => Some(provider.access_token().await?),
            None => None,
        };
        let mut listings = Vec::new();

        for page in 1..=self.config.max_pages.max(1) {
            let response = self.fetch_page(cookie.as_deref(), query, page).await?;
            let count = response.items.len();
            debug!(page, count, "Vinted page fetched");

            listings.extend(
                response
                    .items
                    .into_iter()
                    .map(|item| item.into_raw(&self.base_url)),
            );
            let more = response
                .pagination
                .as_ref()
                .is_some_and(|p| p.has_more_after(page));
            if !more || count == 0 {
                break;
            }
        }

        Ok(listings)
    }

    fn source(&self) -> Source {
        Source::Vinted
    }
}
