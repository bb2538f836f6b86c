//! Handler for the `test-alert` command.

use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use super::command::ListingArgs;
use super::evaluate::print_evaluation;
use super::{listing_from_args, load_config, output};
use crate::adapter::outbound::memory::MemoryDedupStore;
use crate::application::pipeline::Disposition;
use crate::application::rules::SharedRuleBook;
use crate::error::{Result, SendError};
use crate::infrastructure::bootstrap::{
    build_normalizer, build_pipeline, build_rule_book, build_sender,
};

/// Send one alert for the described listing, ignoring threshold and history.
pub async fn execute(config_path: &Path, args: &ListingArgs) -> Result<()> {
    let config = load_config(config_path)?;
    config.init_logging();

    let book = build_rule_book(&config)?;
    let normalizer = build_normalizer(&config);
    let listing = listing_from_args(args, &normalizer, &book.vocabulary)?;

    let pipeline = build_pipeline(
        &config,
        SharedRuleBook::new(book),
        Arc::new(MemoryDedupStore::new(config.alerts.lease_policy())),
        build_sender(&config)?,
    )?;
    let outcome = pipeline.send_test_alert(&listing).await;

    if output::is_json() {
        output::json_output(
            "test_alert",
            json!({
                "listing": listing.key().to_string(),
                "evaluation": outcome.evaluation,
                "result": outcome.disposition.to_string(),
            }),
        );
    } else {
        let qualifies = outcome.evaluation.qualifies(config.alerts.profit_threshold);
        print_evaluation(
            &listing,
            &outcome.evaluation,
            config.alerts.profit_threshold,
            qualifies,
        );
        println!();
    }

    match outcome.disposition {
        Disposition::Notified { attempts } => {
            output::success(&format!("Test alert delivered ({attempts} attempt(s))"));
            Ok(())
        }
        Disposition::Failed { reason, .. } => {
            output::error(&format!("Test alert failed: {reason}"));
            Err(SendError::Permanent(reason).into())
        }
        other => {
            output::warning(&format!("Test alert not sent: {other}"));
            Ok(())
        }
    }
}
