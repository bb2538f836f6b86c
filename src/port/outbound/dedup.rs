//! Durable notification bookkeeping.

use async_trait::async_trait;

use crate::domain::dedup::{CommitOutcome, DedupCounts, DedupRecord, ReserveOutcome};
use crate::domain::id::ListingKey;
use crate::error::Result;

/// Keyed two-phase store guarding against duplicate notifications.
///
/// `reserve` must be atomic across concurrent callers: for any key, at most
/// one caller observes a claim ([`ReserveOutcome::New`] or
/// [`ReserveOutcome::Resumed`]) per lease.
#[async_trait]
pub trait DedupStore: Send + Sync {
    /// Claim a key for sending, or report why it cannot be claimed.
    async fn reserve(&self, key: &ListingKey) -> Result<ReserveOutcome>;

    /// Move a pending key to a terminal status.
    ///
    /// Returns `false` when the key was not pending.
    async fn commit(&self, key: &ListingKey, outcome: CommitOutcome) -> Result<bool>;

    /// Expire the lease of every pending record left by a previous run.
    ///
    /// Returns the number of records affected.
    async fn recover_abandoned(&self) -> Result<usize>;

    async fn get(&self, key: &ListingKey) -> Result<Option<DedupRecord>>;

    async fn counts(&self) -> Result<DedupCounts>;
}
