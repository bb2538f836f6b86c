//! Long-running service entry point.

use tokio::signal;
use tokio::sync::watch;
use tracing::info;

use super::bootstrap::{build_app, App};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Recover abandoned reservations, then poll until `shutdown` flips to true.
///
/// # Errors
/// Returns an error if startup recovery fails.
pub async fn run_with_shutdown(app: App, shutdown: watch::Receiver<bool>) -> Result<()> {
    let recovered = app.store.recover_abandoned().await?;
    if recovered > 0 {
        info!(recovered, "Expired leases left by a previous run");
    }
    app.scheduler.run(shutdown).await;
    Ok(())
}

/// Build the application from `config` and run it until Ctrl+C.
///
/// # Errors
/// Returns an error if wiring or startup recovery fails.
pub async fn run(config: Config) -> Result<()> {
    let app = build_app(&config)?;
    info!(
        keywords = ?config.search.keywords,
        threshold = %config.alerts.profit_threshold,
        "flipper starting"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let service = run_with_shutdown(app, shutdown_rx);
    tokio::pin!(service);

    tokio::select! {
        result = &mut service => {
            info!("flipper stopped");
            return result;
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received (Ctrl+C)");
            let _ = shutdown_tx.send(true);
        }
    }

    let result = service.await;
    info!("flipper stopped");
    result
}
