//! Raw and normalized marketplace listings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ListingKey, Source};
use super::money::Money;

/// Listing fields as extracted from a marketplace payload.
///
/// Adapters fill in whatever the marketplace returned, verbatim. Parsing,
/// validation and fee computation are the normalizer's job, so every field
/// other than `source` is optional and untyped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawListing {
    pub source: Source,
    pub external_id: Option<String>,
    pub title: Option<String>,
    pub price: Option<String>,
    pub currency: Option<String>,
    pub shipping: Option<String>,
    pub url: Option<String>,
    pub posted_at: Option<String>,
    pub category: Option<String>,
    /// Seller positive-feedback percentage (0-100), when the marketplace exposes it.
    pub seller_feedback: Option<String>,
}

impl RawListing {
    /// Start a raw listing for the given source.
    #[must_use]
    pub fn new(source: Source) -> Self {
        Self {
            source,
            external_id: None,
            title: None,
            price: None,
            currency: None,
            shipping: None,
            url: None,
            posted_at: None,
            category: None,
            seller_feedback: None,
        }
    }
}

/// A marketplace offer in the common shape used by the rule engine.
///
/// Reconstructed every cycle; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub source: Source,
    pub external_id: String,
    pub title: String,
    pub price: Money,
    pub currency: String,
    pub shipping_cost: Money,
    pub buyer_protection_fee: Money,
    pub url: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub extracted_brand: Option<String>,
    pub extracted_model: Option<String>,
    pub category: Option<String>,
    pub seller_feedback: Option<Decimal>,
}

impl Listing {
    /// Dedup key for this listing.
    #[must_use]
    pub fn key(&self) -> ListingKey {
        ListingKey::new(self.source, self.external_id.clone())
    }

    /// Price plus shipping plus buyer protection.
    #[must_use]
    pub fn acquisition_cost(&self) -> Money {
        self.price + self.shipping_cost + self.buyer_protection_fee
    }
}
