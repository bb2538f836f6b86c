//! Handler for the `evaluate` command.

use std::path::Path;

use serde_json::json;

use super::command::ListingArgs;
use super::{listing_from_args, load_config, output};
use crate::domain::evaluation::Evaluation;
use crate::domain::listing::Listing;
use crate::domain::money::{currency_symbol, Money};
use crate::error::Result;
use crate::infrastructure::bootstrap::{build_normalizer, build_rule_book};

/// Score a listing against the configured rules. Nothing is stored or sent.
pub fn execute(config_path: &Path, args: &ListingArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let book = build_rule_book(&config)?;
    let normalizer = build_normalizer(&config);

    let listing = listing_from_args(args, &normalizer, &book.vocabulary)?;
    let evaluation = book.engine.evaluate(&listing);
    let qualifies = evaluation.qualifies(config.alerts.profit_threshold);

    if output::is_json() {
        output::json_output(
            "evaluation",
            json!({
                "listing": listing,
                "evaluation": evaluation,
                "threshold": config.alerts.profit_threshold,
                "qualifies": qualifies,
            }),
        );
        return Ok(());
    }

    print_evaluation(&listing, &evaluation, config.alerts.profit_threshold, qualifies);
    Ok(())
}

pub(crate) fn print_evaluation(
    listing: &Listing,
    evaluation: &Evaluation,
    threshold: Money,
    qualifies: bool,
) {
    let symbol = currency_symbol(&listing.currency).unwrap_or("");
    let money = |amount: Money| format!("{symbol}{:.2}", amount);

    output::section(&listing.title);
    output::field("Source", listing.source);
    output::field("Brand", listing.extracted_brand.as_deref().unwrap_or("-"));
    output::field("Model", listing.extracted_model.as_deref().unwrap_or("-"));
    let matched = match &evaluation.matched_value {
        Some(value) => format!("{} ({value})", evaluation.matched_rule_kind),
        None => evaluation.matched_rule_kind.to_string(),
    };
    output::field("Rule", output::highlight(matched));
    output::field("Cost", money(evaluation.acquisition_cost));
    output::field("Resale", money(evaluation.estimated_resale_value));
    let profit = money(evaluation.profit);
    output::field(
        "Profit",
        if evaluation.profit >= Money::ZERO {
            output::positive(profit)
        } else {
            output::negative(profit)
        },
    );
    output::field("Margin", format!("{:.1}%", evaluation.margin * Money::ONE_HUNDRED));
    output::field("Risk", evaluation.risk_level);

    if qualifies {
        output::success(&format!("Clears the {} threshold", money(threshold)));
    } else {
        output::note(&format!("Below the {} threshold", money(threshold)));
    }
}
