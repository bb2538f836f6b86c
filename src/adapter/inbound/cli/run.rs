//! Handler for the `run` command.

use std::path::Path;

use super::command::RunArgs;
use super::{load_config, output};
use crate::error::Result;
use crate::infrastructure::bootstrap::build_app;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::runtime;

/// Execute the run command.
pub async fn execute(config_path: &Path, args: &RunArgs) -> Result<()> {
    let mut config = load_config(config_path)?;
    apply_overrides(&mut config, args);
    config.init_logging();

    if !output::is_quiet() && !args.json_logs {
        print_startup(&config);
    }

    if args.once {
        return run_once(&config).await;
    }
    runtime::run(config).await
}

fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }
    if args.json_logs || output::is_json() {
        config.logging.format = "json".to_string();
    }
}

async fn run_once(config: &Config) -> Result<()> {
    let app = build_app(config)?;
    app.store.recover_abandoned().await?;

    match app.scheduler.run_cycle().await? {
        Some(report) => {
            output::section("Cycle");
            output::field("Fetched", report.fetched);
            output::field("Dropped", report.dropped);
            output::field("Evaluated", report.evaluated);
            output::field("Notified", output::positive(report.notified));
            output::field("Duplicates", report.duplicates);
            output::field("Failed", report.failed);
            output::field("Elapsed", format!("{:.1}s", report.elapsed.as_secs_f64()));
        }
        None => output::warning("A cycle is already running"),
    }
    Ok(())
}

fn print_startup(config: &Config) {
    let mut sources = Vec::new();
    if config.sources.ebay.enabled {
        sources.push("ebay");
    }
    if config.sources.vinted.enabled {
        sources.push("vinted");
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Sources", sources.join(", "));
    output::field("Keywords", config.search.keywords.join(", "));
    output::field("Threshold", config.alerts.profit_threshold);
    output::field("Interval", format!("{}s", config.scheduler.interval_secs));
    if output::verbosity() > 0 {
        output::field("Database", &config.database);
        output::field("Rules", config.rules_path.display());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_logging_settings() {
        let mut config = Config::default();
        let args = RunArgs {
            once: false,
            log_level: Some("debug".into()),
            json_logs: true,
        };
        apply_overrides(&mut config, &args);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }
}
