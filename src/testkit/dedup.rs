//! Dedup store double that can be switched off.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::adapter::outbound::memory::MemoryDedupStore;
use crate::domain::dedup::{CommitOutcome, DedupCounts, DedupRecord, ReserveOutcome};
use crate::domain::id::ListingKey;
use crate::error::{Error, Result};
use crate::port::outbound::dedup::DedupStore;

/// In-memory store that answers every call with [`Error::Database`] while
/// marked unavailable.
#[derive(Debug, Default)]
pub struct FlakyDedupStore {
    inner: MemoryDedupStore,
    unavailable: AtomicBool,
}

impl FlakyDedupStore {
    /// Starts out unavailable.
    pub fn unavailable() -> Self {
        let store = Self::default();
        store.set_unavailable(true);
        store
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::Database("database is locked".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl DedupStore for FlakyDedupStore {
    async fn reserve(&self, key: &ListingKey) -> Result<ReserveOutcome> {
        self.check()?;
        self.inner.reserve(key).await
    }

    async fn commit(&self, key: &ListingKey, outcome: CommitOutcome) -> Result<bool> {
        self.check()?;
        self.inner.commit(key, outcome).await
    }

    async fn recover_abandoned(&self) -> Result<usize> {
        self.check()?;
        self.inner.recover_abandoned().await
    }

    async fn get(&self, key: &ListingKey) -> Result<Option<DedupRecord>> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn counts(&self) -> Result<DedupCounts> {
        self.check()?;
        self.inner.counts().await
    }
}
