//! Vinted `/api/v2/catalog/items` response types.

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::adapter::outbound::loose::{amount_and_currency, opt_text};
use crate::domain::id::Source;
use crate::domain::listing::RawListing;

#[derive(Debug, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub current_page: Option<u32>,
    pub total_pages: Option<u32>,
}

impl Pagination {
    /// Whether pages remain after `page` (1-based).
    #[must_use]
    pub fn has_more_after(&self, page: u32) -> bool {
        self.total_pages.is_some_and(|total| page < total)
    }
}

#[derive(Debug, Deserialize)]
pub struct CatalogItem {
    #[serde(default, deserialize_with = "opt_text")]
    pub id: Option<String>,
    pub title: Option<String>,
    /// String, number or `{amount, currency_code}` depending on API version.
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub price_amount: Value,
    pub currency: Option<String>,
    #[serde(default)]
    pub delivery_price: Value,
    #[serde(default)]
    pub delivery_fee: Value,
    pub url: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub catalog_id: Option<String>,
}

fn first_amount(values: [&Value; 2]) -> (Option<String>, Option<String>) {
    values
        .into_iter()
        .map(amount_and_currency)
        .find(|(amount, _)| amount.is_some())
        .unwrap_or((None, None))
}

impl CatalogItem {
    /// Extract raw fields, resolving relative item URLs against `base`.
    #[must_use]
    pub fn into_raw(self, base: &Url) -> RawListing {
        let (price, price_currency) = first_amount([&self.price, &self.price_amount]);
        let (shipping, _) = first_amount([&self.delivery_price, &self.delivery_fee]);

        let path = self
            .url
            .or_else(|| self.id.as_ref().map(|id| format!("/items/{id}")));
        let url = path.and_then(|path| base.join(&path).ok().map(String::from));

        RawListing {
            external_id: self.id,
            title: self.title,
            price,
            currency: price_currency.or(self.currency),
            shipping,
            url,
            posted_at: self.created_at,
            category: self.catalog_id,
            ..RawListing::new(Source::Vinted)
        }
    }
}
