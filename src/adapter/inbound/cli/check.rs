//! Handler for the `check-config` command.

use std::path::Path;

use serde_json::json;

use super::{load_config, output};
use crate::adapter::outbound::token::EnvTokenProvider;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_rule_book;

/// Validate the config and rules files and report missing secrets.
///
/// Missing secrets are warnings; invalid files are errors.
pub fn execute(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let book = build_rule_book(&config)?;

    let mut warnings = Vec::new();
    let ebay = &config.sources.ebay;
    if ebay.enabled && !EnvTokenProvider::new(&ebay.token_env).is_set() {
        warnings.push(format!("{} is not set; eBay fetches will fail", ebay.token_env));
    }
    if config.whatsapp.resolve_phone_number_id().is_none() {
        warnings.push(format!(
            "WhatsApp phone number id missing (set whatsapp.phone_number_id or {})",
            config.whatsapp.phone_number_id_env
        ));
    }
    if !EnvTokenProvider::new(&config.whatsapp.token_env).is_set() {
        warnings.push(format!("{} is not set; alerts cannot be sent", config.whatsapp.token_env));
    }
    if let Err(err) = config.alerts.resolve_recipient() {
        warnings.push(format!("alert recipient: {err}"));
    }

    let mut sources = Vec::new();
    if ebay.enabled {
        sources.push("ebay");
    }
    if config.sources.vinted.enabled {
        sources.push("vinted");
    }

    if output::is_json() {
        output::json_output(
            "check_config",
            json!({
                "config": config_path.display().to_string(),
                "rules": book.engine.rules().len(),
                "sources": sources,
                "warnings": warnings,
                "valid": true,
            }),
        );
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Config", config_path.display());
    output::field("Rules", config.rules_path.display());
    output::field("Sources", sources.join(", "));
    output::field("Keywords", config.search.keywords.join(", "));
    output::field("Threshold", config.alerts.profit_threshold);
    output::field(
        "Vocabulary",
        format!(
            "{} brands, {} models",
            book.vocabulary.brand_count(),
            book.vocabulary.model_count()
        ),
    );
    println!();
    for warning in &warnings {
        output::warning(warning);
    }
    output::success(&format!(
        "Configuration valid ({} rules)",
        book.engine.rules().len()
    ));
    Ok(())
}
