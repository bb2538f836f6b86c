//! Monetary types for prices, fees and resale estimates.

use rust_decimal::{Decimal, RoundingStrategy};

/// Amount of money in the listing currency.
pub type Money = Decimal;

/// Largest price, shipping cost, fee or fixed resale value accepted anywhere.
///
/// Keeps every sum and product of two bounded amounts well inside
/// [`Decimal`]'s range, so evaluation arithmetic cannot overflow.
pub const MAX_AMOUNT: Money = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Largest resale multiplier a rule may declare.
pub const MAX_MULTIPLIER: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);

/// Round an amount to two decimal places, midpoints away from zero.
#[must_use]
pub fn round_money(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Display symbol for an ISO 4217 currency code, if one is commonly used.
#[must_use]
pub fn currency_symbol(code: &str) -> Option<&'static str> {
    match code.to_ascii_uppercase().as_str() {
        "GBP" => Some("£"),
        "EUR" => Some("€"),
        "USD" => Some("$"),
        _ => None,
    }
}
