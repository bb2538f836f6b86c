//! Periodic polling cycles.
//!
//! A cycle fetches every registered source concurrently, normalizes what came
//! back and runs each listing through the [`Pipeline`]. A failing source or
//! listing is logged and skipped; only a dedup store failure aborts the cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use tokio::sync::watch;
use tokio::time::{interval, sleep, timeout, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::normalize::Normalizer;
use super::pipeline::{Disposition, Pipeline};
use super::rules::RuleSource;
use crate::domain::listing::{Listing, RawListing};
use crate::error::{FetchError, Result};
use crate::port::outbound::source::{ListingSource, SearchQuery, SourceRegistry};

/// Timing and concurrency limits for the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSettings {
    pub interval: Duration,
    pub fetch_concurrency: usize,
    pub listing_concurrency: usize,
    pub fetch_timeout: Duration,
    /// Attempts per source per cycle, including the first.
    pub fetch_max_attempts: u32,
    pub fetch_retry_backoff: Duration,
    /// How long an in-flight cycle may run after shutdown is requested.
    pub shutdown_grace: Duration,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            fetch_concurrency: 4,
            listing_concurrency: 8,
            fetch_timeout: Duration::from_secs(30),
            fetch_max_attempts: 2,
            fetch_retry_backoff: Duration::from_millis(2000),
            shutdown_grace: Duration::from_secs(30),
        }
    }
}

/// Counters for one completed cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub sources_ok: usize,
    pub sources_failed: usize,
    pub fetched: usize,
    pub dropped: usize,
    pub evaluated: usize,
    pub below_threshold: usize,
    pub duplicates: usize,
    pub notified: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl CycleReport {
    fn record(&mut self, disposition: &Disposition) {
        self.evaluated += 1;
        match disposition {
            Disposition::BelowThreshold => self.below_threshold += 1,
            Disposition::Duplicate(_) => self.duplicates += 1,
            Disposition::Notified { .. } => self.notified += 1,
            Disposition::Failed { .. } => self.failed += 1,
        }
    }
}

/// Clears the in-flight flag when a cycle ends, however it ends.
struct CycleGuard<'a>(&'a AtomicBool);

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Scheduler {
    sources: SourceRegistry,
    query: SearchQuery,
    normalizer: Normalizer,
    pipeline: Arc<Pipeline>,
    rule_source: Option<Arc<dyn RuleSource>>,
    settings: SchedulerSettings,
    in_flight: AtomicBool,
}

impl Scheduler {
    #[must_use]
    pub fn new(
        sources: SourceRegistry,
        query: SearchQuery,
        normalizer: Normalizer,
        pipeline: Arc<Pipeline>,
        settings: SchedulerSettings,
    ) -> Self {
        Self {
            sources,
            query,
            normalizer,
            pipeline,
            rule_source: None,
            settings,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Re-read rules from `source` at the start of every cycle.
    #[must_use]
    pub fn with_rule_source(mut self, source: Arc<dyn RuleSource>) -> Self {
        self.rule_source = Some(source);
        self
    }

    #[must_use]
    pub fn pipeline(&self) -> &Arc<Pipeline> {
        &self.pipeline
    }

    #[must_use]
    pub fn is_cycle_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run cycles on the configured interval until `shutdown` flips to true.
    ///
    /// The first cycle starts immediately. Ticks that arrive while a cycle is
    /// still running are skipped, never queued.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            sources = self.sources.len(),
            interval_secs = self.settings.interval.as_secs(),
            "Scheduler started"
        );
        let mut ticker = interval(self.settings.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                () = wait_for_shutdown(&mut shutdown) => {
                    info!("Shutdown signal received");
                    break;
                }
                _ = ticker.tick() => {
                    let cycle = self.run_cycle();
                    tokio::pin!(cycle);
                    tokio::select! {
                        result = &mut cycle => log_cycle(result),
                        () = wait_for_shutdown(&mut shutdown) => {
                            info!(
                                grace_secs = self.settings.shutdown_grace.as_secs(),
                                "Shutdown signal received, waiting for in-flight cycle"
                            );
                            match timeout(self.settings.shutdown_grace, &mut cycle).await {
                                Ok(result) => log_cycle(result),
                                Err(_) => warn!("In-flight cycle abandoned after shutdown grace period"),
                            }
                            break;
                        }
                    }
                }
            }
        }

        info!("Scheduler stopped");
    }

    /// Run one cycle now.
    ///
    /// Returns `Ok(None)` without doing anything if another cycle is in flight.
    ///
    /// # Errors
    ///
    /// Returns an error when the dedup store fails; the rest of the cycle is
    /// abandoned.
    pub async fn run_cycle(&self) -> Result<Option<CycleReport>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Previous cycle still running, skipping");
            return Ok(None);
        }
        let _guard = CycleGuard(&self.in_flight);

        let started = Instant::now();
        let mut report = CycleReport::default();

        self.reload_rules();
        let book = self.pipeline.rules().snapshot();

        let raw = self.fetch_all(&mut report).await;
        report.fetched = raw.len();

        let listings: Vec<Listing> = raw
            .into_iter()
            .filter_map(|raw| {
                let source = raw.source;
                let external_id = raw.external_id.clone().unwrap_or_default();
                match self.normalizer.normalize(raw, &book.vocabulary) {
                    Ok(listing) => Some(listing),
                    Err(err) => {
                        warn!(%source, external_id = %external_id, error = %err, "Dropping listing");
                        report.dropped += 1;
                        None
                    }
                }
            })
            .collect();

        let engine = &book.engine;
        let pipeline = &self.pipeline;
        let mut outcomes = stream::iter(listings)
            .map(|listing| async move { pipeline.process(engine, &listing).await })
            .buffer_unordered(self.settings.listing_concurrency.max(1))
            .boxed();

        while let Some(result) = outcomes.next().await {
            let outcome = result?;
            report.record(&outcome.disposition);
        }

        report.elapsed = started.elapsed();
        Ok(Some(report))
    }

    fn reload_rules(&self) {
        let Some(source) = &self.rule_source else {
            return;
        };
        match source.reload_if_changed() {
            Ok(Some(book)) => {
                info!(rules = book.engine.rules().len(), "Rules reloaded");
                self.pipeline.rules().replace(book);
            }
            Ok(None) => {}
            Err(err) => error!(error = %err, "Rules reload failed, keeping previous rules"),
        }
    }

    async fn fetch_all(&self, report: &mut CycleReport) -> Vec<RawListing> {
        let results: Vec<_> = stream::iter(self.sources.sources().iter().cloned())
            .map(|source| async move {
                let name = source.source();
                (name, self.fetch_source(source.as_ref()).await)
            })
            .buffer_unordered(self.settings.fetch_concurrency.max(1))
            .boxed()
            .collect()
            .await;

        let mut listings = Vec::new();
        for (name, result) in results {
            match result {
                Ok(batch) => {
                    debug!(source = %name, count = batch.len(), "Source fetched");
                    report.sources_ok += 1;
                    listings.extend(batch);
                }
                Err(err) => {
                    warn!(source = %name, error = %err, "Source fetch failed, skipping for this cycle");
                    report.sources_failed += 1;
                }
            }
        }
        listings
    }

    async fn fetch_source(
        &self,
        source: &dyn ListingSource,
    ) -> std::result::Result<Vec<RawListing>, FetchError> {
        let max_attempts = self.settings.fetch_max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let result = timeout(self.settings.fetch_timeout, source.fetch_listings(&self.query))
                .await
                .unwrap_or(Err(FetchError::Timeout));

            match result {
                Ok(listings) => return Ok(listings),
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let delay = self.settings.fetch_retry_backoff.saturating_mul(attempt);
                    warn!(
                        source = %source.source(),
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Source fetch failed, retrying"
                    );
                    sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

fn log_cycle(result: Result<Option<CycleReport>>) {
    match result {
        Ok(Some(report)) => info!(
            sources_ok = report.sources_ok,
            sources_failed = report.sources_failed,
            fetched = report.fetched,
            dropped = report.dropped,
            evaluated = report.evaluated,
            below_threshold = report.below_threshold,
            duplicates = report.duplicates,
            notified = report.notified,
            failed = report.failed,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Cycle complete"
        ),
        Ok(None) => {}
        Err(err) if err.is_storage() => {
            error!(error = %err, "Dedup store unavailable, cycle aborted");
        }
        Err(err) => error!(error = %err, "Cycle failed"),
    }
}
