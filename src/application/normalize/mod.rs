//! Raw listing to [`Listing`] conversion.
//!
//! Adapters hand over marketplace fields verbatim; this module owns money
//! parsing, currency checks, buyer-protection fees and brand/model tagging.

mod vocabulary;

pub use crate::domain::rule::tokenize;
pub use vocabulary::Vocabulary;

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::domain::id::Source;
use crate::domain::listing::{Listing, RawListing};
use crate::domain::money::{round_money, Money, MAX_AMOUNT};
use crate::error::NormalizationError;

/// Buyer-protection fee charged by a marketplace: `percent × price + fixed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    /// Fraction of the price, e.g. `0.05` for 5%.
    pub percent: Decimal,
    pub fixed: Money,
}

impl FeeSchedule {
    #[must_use]
    pub const fn new(percent: Decimal, fixed: Money) -> Self {
        Self { percent, fixed }
    }

    /// No protection fee.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(Decimal::ZERO, Decimal::ZERO)
    }

    /// Fee for an item at `price`, rounded to pence; zero for free items.
    #[must_use]
    pub fn fee(&self, price: Money) -> Money {
        if price <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        round_money(price * self.percent + self.fixed)
    }

    /// Default schedule for a marketplace.
    #[must_use]
    pub fn default_for(source: Source) -> Self {
        match source {
            Source::Vinted => Self::new(dec!(0.05), dec!(0.70)),
            Source::Ebay | Source::Manual => Self::none(),
        }
    }
}

/// Parse a marketplace money string such as `"12.50"`, `"£1,250"`,
/// `"£1,250.00"`, `"12,50"` or `"1.250,00"`.
///
/// A lone comma followed by one or two digits is a decimal comma; any other
/// comma groups thousands. When both separators appear, the last one is the
/// decimal point.
#[must_use]
pub fn parse_money(input: &str) -> Option<Money> {
    let trimmed = input
        .trim()
        .trim_start_matches(['£', '€', '$'])
        .trim();
    let cleaned = match (trimmed.rfind(','), trimmed.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => trimmed.replace('.', "").replace(',', "."),
        (Some(comma), None) if is_decimal_comma(trimmed, comma) => trimmed.replace(',', "."),
        _ => trimmed.replace(',', ""),
    };
    Decimal::from_str(&cleaned).ok().map(round_money)
}

fn is_decimal_comma(text: &str, comma: usize) -> bool {
    let fraction = &text[comma + 1..];
    text.matches(',').count() == 1
        && (1..=2).contains(&fraction.len())
        && fraction.chars().all(|c| c.is_ascii_digit())
}

/// Parse a price, accepting only amounts in `(0, MAX_AMOUNT]`.
fn parse_price(text: &str) -> Option<Money> {
    parse_money(text).filter(|amount| *amount > Decimal::ZERO && *amount <= MAX_AMOUNT)
}

fn required(value: Option<String>, field: &'static str) -> Result<String, NormalizationError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(NormalizationError::MissingField { field })
}

/// Converts raw listings into the common [`Listing`] shape.
#[derive(Debug, Clone)]
pub struct Normalizer {
    base_currency: String,
    fees: HashMap<Source, FeeSchedule>,
}

impl Normalizer {
    /// Normalizer accepting only `base_currency`, with default fee schedules.
    pub fn new(base_currency: impl Into<String>) -> Self {
        let fees = [Source::Ebay, Source::Vinted, Source::Manual]
            .into_iter()
            .map(|source| (source, FeeSchedule::default_for(source)))
            .collect();
        Self {
            base_currency: base_currency.into().trim().to_ascii_uppercase(),
            fees,
        }
    }

    #[must_use]
    pub fn with_fee_schedule(mut self, source: Source, schedule: FeeSchedule) -> Self {
        self.fees.insert(source, schedule);
        self
    }

    #[must_use]
    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    #[must_use]
    pub fn fee_schedule(&self, source: Source) -> FeeSchedule {
        self.fees
            .get(&source)
            .copied()
            .unwrap_or_else(|| FeeSchedule::default_for(source))
    }

    /// Validate and convert one raw listing.
    ///
    /// # Errors
    ///
    /// Fails when the external id, title or price is missing, when the price
    /// is unparseable, not positive or above [`MAX_AMOUNT`], when shipping is
    /// above [`MAX_AMOUNT`], or when the listing is priced in a currency other
    /// than the base currency.
    pub fn normalize(
        &self,
        raw: RawListing,
        vocabulary: &Vocabulary,
    ) -> Result<Listing, NormalizationError> {
        let source = raw.source;
        let external_id = required(raw.external_id, "external_id")?;
        let title = required(raw.title, "title")?;
        let price_text = required(raw.price, "price")?;
        let price = parse_price(&price_text)
            .ok_or_else(|| NormalizationError::InvalidField {
                field: "price",
                value: price_text.clone(),
            })?;

        let currency = raw
            .currency
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| self.base_currency.clone());
        if currency != self.base_currency {
            return Err(NormalizationError::UnsupportedCurrency {
                found: currency,
                expected: self.base_currency.clone(),
            });
        }

        let shipping_cost = match raw.shipping.as_deref().map(str::trim) {
            None | Some("") => Decimal::ZERO,
            Some(text) => match parse_money(text) {
                Some(amount) if amount > MAX_AMOUNT => {
                    return Err(NormalizationError::InvalidField {
                        field: "shipping",
                        value: text.to_string(),
                    });
                }
                Some(amount) if amount >= Decimal::ZERO => amount,
                _ => {
                    debug!(%source, external_id = %external_id, shipping = text, "Unparseable shipping cost, using zero");
                    Decimal::ZERO
                }
            },
        };

        let posted_at = raw.posted_at.as_deref().and_then(|text| {
            DateTime::parse_from_rfc3339(text.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        });

        let seller_feedback = raw
            .seller_feedback
            .as_deref()
            .and_then(|text| Decimal::from_str(text.trim().trim_end_matches('%')).ok());

        Ok(Listing {
            source,
            buyer_protection_fee: self.fee_schedule(source).fee(price),
            extracted_brand: vocabulary.extract_brand(&title).map(str::to_string),
            extracted_model: vocabulary.extract_model(&title).map(str::to_string),
            external_id,
            title,
            price,
            currency,
            shipping_cost,
            url: raw.url.map(|u| u.trim().to_string()).unwrap_or_default(),
            posted_at,
            category: raw.category.filter(|c| !c.trim().is_empty()),
            seller_feedback,
        })
    }
}
