//! Alert message body.

use crate::domain::evaluation::Evaluation;
use crate::domain::listing::Listing;
use crate::domain::money::currency_symbol;

/// Render the text alert for a qualifying listing.
#[must_use]
pub fn format_alert(listing: &Listing, evaluation: &Evaluation) -> String {
    let symbol = currency_symbol(&listing.currency).unwrap_or("");
    let amount = |value: rust_decimal::Decimal| format!("{symbol}{value:.2}");

    let mut body = String::from("New Flip Alert\n");
    body.push_str(&format!("Title: {}\n", listing.title));
    body.push_str(&format!("Link: {}\n", listing.url));
    body.push_str(&format!("Source: {}\n\n", listing.source));
    body.push_str("Costs\n");
    body.push_str(&format!("Product: {}\n", amount(listing.price)));
    body.push_str(&format!(
        "Buyer protection: {}\n",
        amount(listing.buyer_protection_fee)
    ));
    body.push_str(&format!("Shipping: {}\n", amount(listing.shipping_cost)));
    body.push_str(&format!("Total: {}\n\n", amount(evaluation.acquisition_cost)));
    body.push_str(&format!(
        "Potential resale: {}\n",
        amount(evaluation.estimated_resale_value)
    ));
    body.push_str(&format!(
        "Estimated profit: {}  [{} risk]",
        amount(evaluation.profit),
        evaluation.risk_level
    ));
    body
}
