//! Handler for the `status` command.

use std::path::Path;

use serde_json::json;

use super::{load_config, output};
use crate::error::Result;
use crate::infrastructure::bootstrap::build_dedup_store;

/// Print per-status totals from the dedup database.
pub async fn execute(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;

    if config.database != ":memory:" && !Path::new(&config.database).exists() {
        if output::is_json() {
            output::json_output(
                "status",
                json!({ "database": config.database, "status": "missing_database" }),
            );
        } else {
            output::header(env!("CARGO_PKG_VERSION"));
            output::warning(&format!("Database not found ({})", config.database));
            output::note("Run `flipper run` to start polling and create the database.");
        }
        return Ok(());
    }

    let store = build_dedup_store(&config)?;
    let counts = store.counts().await?;

    if output::is_json() {
        output::json_output(
            "status",
            json!({ "database": config.database, "status": "ok", "counts": counts }),
        );
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Database", &config.database);
    output::section("Alerts");
    output::field("Sent", output::positive(counts.sent));
    output::field("Pending", counts.pending);
    output::field(
        "Failed",
        if counts.failed_permanent > 0 {
            output::negative(counts.failed_permanent)
        } else {
            counts.failed_permanent.to_string()
        },
    );
    output::field("Total", counts.total());
    Ok(())
}
