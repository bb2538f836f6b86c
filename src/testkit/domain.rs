//! Builders for domain primitives used across tests.

use rust_decimal_macros::dec;

use crate::application::normalize::Vocabulary;
use crate::application::rules::{RiskPolicy, RuleBook, RuleEngine};
use crate::domain::id::Source;
use crate::domain::listing::{Listing, RawListing};
use crate::domain::money::Money;
use crate::domain::notification::Msisdn;
use crate::domain::rule::{ResaleValue, Rule, RuleSet};

/// A GBP listing with no shipping, fees or extracted terms.
pub fn listing(source: Source, id: &str, title: &str, price: Money) -> Listing {
    Listing {
        source,
        external_id: id.to_string(),
        title: title.to_string(),
        price,
        currency: "GBP".to_string(),
        shipping_cost: Money::ZERO,
        buyer_protection_fee: Money::ZERO,
        url: format!("https://example.com/{}/{id}", source.as_str()),
        posted_at: None,
        extracted_brand: None,
        extracted_model: None,
        category: None,
        seller_feedback: None,
    }
}

/// The TaylorMade M6 listing: 80 + 5 shipping + 3 protection = 88.
///
/// Against [`golf_rules`] it resolves to the fixed 150 model rule, for a
/// profit of 62.
pub fn m6_listing(id: &str) -> Listing {
    Listing {
        shipping_cost: dec!(5),
        buyer_protection_fee: dec!(3),
        extracted_brand: Some("TaylorMade".to_string()),
        extracted_model: Some("TaylorMade M6".to_string()),
        ..listing(Source::Ebay, id, "TaylorMade M6 Driver 10.5", dec!(80))
    }
}

/// Raw listing with the fields a marketplace adapter would fill in.
pub fn raw_listing(source: Source, id: &str, title: &str, price: &str) -> RawListing {
    let mut raw = RawListing::new(source);
    raw.external_id = Some(id.to_string());
    raw.title = Some(title.to_string());
    raw.price = Some(price.to_string());
    raw.currency = Some("GBP".to_string());
    raw.url = Some(format!("https://example.com/{}/{id}", source.as_str()));
    raw
}

/// Default x1.5, TaylorMade brand x1.8, TaylorMade M6 model fixed 150.
pub fn golf_rules() -> RuleSet {
    RuleSet::new(vec![
        Rule::default_multiplier(dec!(1.5)),
        Rule::brand("TaylorMade", ResaleValue::Multiplier(dec!(1.8))),
        Rule::model("TaylorMade M6", ResaleValue::Fixed(dec!(150))),
    ])
    .unwrap_or_else(|err| panic!("golf rules are valid: {err}"))
}

/// [`golf_rules`] with the default risk policy and no extra vocabulary.
pub fn golf_rule_book() -> RuleBook {
    RuleBook::new(
        RuleEngine::new(golf_rules(), RiskPolicy::default()),
        Vocabulary::default(),
    )
}

pub fn recipient() -> Msisdn {
    Msisdn::parse("+447700900123").unwrap_or_else(|err| panic!("valid test MSISDN: {err}"))
}
