//! In-process dedup store.
//!
//! Holds records in a [`DashMap`]; every reservation runs under the entry
//! lock for its key, which makes `reserve` atomic across tasks. State does
//! not survive a restart, so this store suits `database = ":memory:"` runs and
//! tests rather than production.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::dedup::{
    CommitOutcome, DedupCounts, DedupRecord, DedupStatus, LeasePolicy, ReserveOutcome,
};
use crate::domain::id::ListingKey;
use crate::error::Result;
use crate::port::outbound::dedup::DedupStore;

#[derive(Debug, Default)]
pub struct MemoryDedupStore {
    records: DashMap<ListingKey, DedupRecord>,
    policy: LeasePolicy,
}

impl MemoryDedupStore {
    #[must_use]
    pub fn new(policy: LeasePolicy) -> Self {
        Self {
            records: DashMap::new(),
            policy,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl DedupStore for MemoryDedupStore {
    async fn reserve(&self, key: &ListingKey) -> Result<ReserveOutcome> {
        let now = Utc::now();
        let outcome = match self.records.entry(key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(DedupRecord::pending(key.clone(), now));
                ReserveOutcome::New
            }
            Entry::Occupied(mut slot) => slot.get_mut().reserve_existing(now, &self.policy),
        };
        Ok(outcome)
    }

    async fn commit(&self, key: &ListingKey, outcome: CommitOutcome) -> Result<bool> {
        let Some(mut record) = self.records.get_mut(key) else {
            return Ok(false);
        };
        if record.status != DedupStatus::Pending {
            return Ok(false);
        }
        record.status = outcome.status();
        record.last_attempt_at = Utc::now();
        Ok(true)
    }

    async fn recover_abandoned(&self) -> Result<usize> {
        let mut recovered = 0;
        for mut record in self.records.iter_mut() {
            if record.status == DedupStatus::Pending {
                record.last_attempt_at = DateTime::<Utc>::UNIX_EPOCH;
                recovered += 1;
            }
        }
        Ok(recovered)
    }

    async fn get(&self, key: &ListingKey) -> Result<Option<DedupRecord>> {
        Ok(self.records.get(key).map(|r| r.value().clone()))
    }

    async fn counts(&self) -> Result<DedupCounts> {
        let mut counts = DedupCounts::default();
        for record in &self.records {
            counts.add(record.status, 1);
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::domain::id::Source;

    fn key(id: &str) -> ListingKey {
        ListingKey::new(Source::Ebay, id)
    }

    #[tokio::test]
    async fn first_reserve_claims_then_blocks() {
        let store = MemoryDedupStore::default();
        assert_eq!(store.reserve(&key("1")).await.unwrap(), ReserveOutcome::New);
        assert_eq!(
            store.reserve(&key("1")).await.unwrap(),
            ReserveOutcome::AlreadyPending
        );
    }

    #[tokio::test]
    async fn committed_keys_are_terminal() {
        let store = MemoryDedupStore::default();
        store.reserve(&key("1")).await.unwrap();
        assert!(store.commit(&key("1"), CommitOutcome::Sent).await.unwrap());
        assert!(!store
            .commit(&key("1"), CommitOutcome::FailedPermanent)
            .await
            .unwrap());
        assert_eq!(
            store.reserve(&key("1")).await.unwrap(),
            ReserveOutcome::AlreadySent
        );
    }

    #[test]
    fn commit_without_reservation_is_rejected() {
        let store = MemoryDedupStore::default();
        let committed = tokio_test::block_on(store.commit(&key("9"), CommitOutcome::Sent));
        assert!(!tokio_test::assert_ok!(committed));
    }

    #[tokio::test]
    async fn recovered_records_can_be_resumed() {
        let store = MemoryDedupStore::new(LeasePolicy::new(Duration::from_secs(3600), 3));
        store.reserve(&key("1")).await.unwrap();
        assert_eq!(store.recover_abandoned().await.unwrap(), 1);
        assert_eq!(
            store.reserve(&key("1")).await.unwrap(),
            ReserveOutcome::Resumed { attempt: 2 }
        );
    }

    #[tokio::test]
    async fn concurrent_reserves_have_one_winner() {
        let store = Arc::new(MemoryDedupStore::default());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.reserve(&key("race")).await.unwrap() })
            })
            .collect();

        let mut claims = 0;
        for handle in handles {
            if handle.await.unwrap().is_claimed() {
                claims += 1;
            }
        }
        assert_eq!(claims, 1);
    }

    #[tokio::test]
    async fn counts_group_by_status() {
        let store = MemoryDedupStore::default();
        store.reserve(&key("1")).await.unwrap();
        store.reserve(&key("2")).await.unwrap();
        store.commit(&key("2"), CommitOutcome::Sent).await.unwrap();

        let counts = store.counts().await.unwrap();
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.sent, 1);
        assert_eq!(counts.total(), 2);
    }
}
