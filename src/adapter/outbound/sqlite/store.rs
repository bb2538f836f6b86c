//! SQLite dedup store.
//!
//! Every transition is a single conditional statement, so concurrent
//! pipelines (or processes sharing the database file) cannot both claim a
//! key: `INSERT OR IGNORE` decides first sightings, and a guarded `UPDATE`
//! decides reclaims of abandoned reservations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::SqliteConnection;
use tracing::debug;

use super::database::connection::DbPool;
use super::database::model::{timestamp, AlertRow};
use super::database::schema::listing_alerts;
use crate::domain::dedup::{
    CommitOutcome, DedupCounts, DedupRecord, DedupStatus, LeasePolicy, ReserveOutcome,
};
use crate::domain::id::ListingKey;
use crate::error::{Error, Result};
use crate::port::outbound::dedup::DedupStore;

type Conn = PooledConnection<ConnectionManager<SqliteConnection>>;

const PENDING: &str = DedupStatus::Pending.as_str();

/// SQLite-backed [`DedupStore`].
pub struct SqliteDedupStore {
    pool: DbPool,
    policy: LeasePolicy,
}

impl SqliteDedupStore {
    #[must_use]
    pub fn new(pool: DbPool, policy: LeasePolicy) -> Self {
        Self { pool, policy }
    }

    #[must_use]
    pub fn policy(&self) -> LeasePolicy {
        self.policy
    }

    fn conn(&self) -> Result<Conn> {
        self.pool.get().map_err(|e| Error::Connection(e.to_string()))
    }

    fn load(conn: &mut Conn, key: &ListingKey) -> Result<Option<AlertRow>> {
        listing_alerts::table
            .find((key.source().as_str(), key.external_id()))
            .select(AlertRow::as_select())
            .first(conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))
    }

    fn reclaim(&self, conn: &mut Conn, key: &ListingKey, now: DateTime<Utc>) -> Result<bool> {
        let cutoff = timestamp(self.policy.expiry_cutoff(now));
        let max_attempts = i32::try_from(self.policy.max_attempts).unwrap_or(i32::MAX);
        let target = listing_alerts::table
            .find((key.source().as_str(), key.external_id()))
            .filter(listing_alerts::status.eq(PENDING))
            .filter(listing_alerts::last_attempt_at.le(cutoff))
            .filter(listing_alerts::attempt_count.lt(max_attempts));

        let updated = diesel::update(target)
            .set((
                listing_alerts::attempt_count.eq(listing_alerts::attempt_count + 1),
                listing_alerts::last_attempt_at.eq(timestamp(now)),
            ))
            .execute(conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(updated == 1)
    }

    fn retire(&self, conn: &mut Conn, key: &ListingKey) -> Result<()> {
        let max_attempts = i32::try_from(self.policy.max_attempts).unwrap_or(i32::MAX);
        let target = listing_alerts::table
            .find((key.source().as_str(), key.external_id()))
            .filter(listing_alerts::status.eq(PENDING))
            .filter(listing_alerts::attempt_count.ge(max_attempts));

        diesel::update(target)
            .set(listing_alerts::status.eq(DedupStatus::FailedPermanent.as_str()))
            .execute(conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl DedupStore for SqliteDedupStore {
    async fn reserve(&self, key: &ListingKey) -> Result<ReserveOutcome> {
        let mut conn = self.conn()?;
        let now = Utc::now();

        let inserted = diesel::insert_or_ignore_into(listing_alerts::table)
            .values(&AlertRow::pending(key, now))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        if inserted == 1 {
            return Ok(ReserveOutcome::New);
        }

        if self.reclaim(&mut conn, key, now)? {
            let attempt = Self::load(&mut conn, key)?
                .map_or(self.policy.max_attempts, |row| {
                    u32::try_from(row.attempt_count).unwrap_or(self.policy.max_attempts)
                });
            debug!(key = %key, attempt, "Reclaimed abandoned reservation");
            return Ok(ReserveOutcome::Resumed { attempt });
        }

        let Some(row) = Self::load(&mut conn, key)? else {
            return Err(Error::Database(format!("dedup record for {key} vanished")));
        };
        let record = row.into_record()?;
        let outcome = match record.status {
            DedupStatus::Sent => ReserveOutcome::AlreadySent,
            DedupStatus::FailedPermanent => ReserveOutcome::AlreadyFailed,
            DedupStatus::Pending
                if self.policy.is_expired(record.last_attempt_at, now)
                    && record.attempt_count >= self.policy.max_attempts =>
            {
                self.retire(&mut conn, key)?;
                debug!(key = %key, attempts = record.attempt_count, "Retired exhausted reservation");
                ReserveOutcome::AlreadyFailed
            }
            DedupStatus::Pending => ReserveOutcome::AlreadyPending,
        };
        Ok(outcome)
    }

    async fn commit(&self, key: &ListingKey, outcome: CommitOutcome) -> Result<bool> {
        let mut conn = self.conn()?;
        let target = listing_alerts::table
            .find((key.source().as_str(), key.external_id()))
            .filter(listing_alerts::status.eq(PENDING));

        let updated = diesel::update(target)
            .set((
                listing_alerts::status.eq(outcome.status().as_str()),
                listing_alerts::last_attempt_at.eq(timestamp(Utc::now())),
            ))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(updated == 1)
    }

    async fn recover_abandoned(&self) -> Result<usize> {
        let mut conn = self.conn()?;
        diesel::update(listing_alerts::table.filter(listing_alerts::status.eq(PENDING)))
            .set(listing_alerts::last_attempt_at.eq(timestamp(DateTime::<Utc>::UNIX_EPOCH)))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))
    }

    async fn get(&self, key: &ListingKey) -> Result<Option<DedupRecord>> {
        let mut conn = self.conn()?;
        Self::load(&mut conn, key)?
            .map(AlertRow::into_record)
            .transpose()
    }

    async fn counts(&self) -> Result<DedupCounts> {
        let mut conn = self.conn()?;
        let rows: Vec<(String, i64)> = listing_alerts::table
            .group_by(listing_alerts::status)
            .select((listing_alerts::status, count_star()))
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut counts = DedupCounts::default();
        for (status, count) in rows {
            let status: DedupStatus = status.parse().map_err(Error::Parse)?;
            counts.add(status, u64::try_from(count).unwrap_or(0));
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::open;
    use crate::domain::id::Source;

    fn store(lease: Duration, max_attempts: u32) -> SqliteDedupStore {
        SqliteDedupStore::new(open(":memory:").unwrap(), LeasePolicy::new(lease, max_attempts))
    }

    fn key(id: &str) -> ListingKey {
        ListingKey::new(Source::Vinted, id)
    }

    #[tokio::test]
    async fn reserve_then_commit_sent() {
        let store = store(Duration::from_secs(600), 3);
        assert_eq!(store.reserve(&key("1")).await.unwrap(), ReserveOutcome::New);
        assert_eq!(
            store.reserve(&key("1")).await.unwrap(),
            ReserveOutcome::AlreadyPending
        );
        assert!(store.commit(&key("1"), CommitOutcome::Sent).await.unwrap());
        assert_eq!(
            store.reserve(&key("1")).await.unwrap(),
            ReserveOutcome::AlreadySent
        );

        let record = store.get(&key("1")).await.unwrap().unwrap();
        assert_eq!(record.status, DedupStatus::Sent);
        assert_eq!(record.attempt_count, 1);
    }

    #[tokio::test]
    async fn commit_is_single_shot() {
        let store = store(Duration::from_secs(600), 3);
        store.reserve(&key("1")).await.unwrap();
        assert!(store
            .commit(&key("1"), CommitOutcome::FailedPermanent)
            .await
            .unwrap());
        assert!(!store.commit(&key("1"), CommitOutcome::Sent).await.unwrap());
        assert_eq!(
            store.reserve(&key("1")).await.unwrap(),
            ReserveOutcome::AlreadyFailed
        );
    }

    #[tokio::test]
    async fn expired_lease_is_resumed_until_exhausted() {
        let store = store(Duration::ZERO, 2);
        assert_eq!(store.reserve(&key("1")).await.unwrap(), ReserveOutcome::New);
        assert_eq!(
            store.reserve(&key("1")).await.unwrap(),
            ReserveOutcome::Resumed { attempt: 2 }
        );
        assert_eq!(
            store.reserve(&key("1")).await.unwrap(),
            ReserveOutcome::AlreadyFailed
        );

        let record = store.get(&key("1")).await.unwrap().unwrap();
        assert_eq!(record.status, DedupStatus::FailedPermanent);
    }

    #[tokio::test]
    async fn recover_abandoned_expires_pending_leases() {
        let store = store(Duration::from_secs(3600), 3);
        store.reserve(&key("1")).await.unwrap();
        store.reserve(&key("2")).await.unwrap();
        store.commit(&key("2"), CommitOutcome::Sent).await.unwrap();

        assert_eq!(store.recover_abandoned().await.unwrap(), 1);
        assert_eq!(
            store.reserve(&key("1")).await.unwrap(),
            ReserveOutcome::Resumed { attempt: 2 }
        );
    }

    #[tokio::test]
    async fn counts_group_by_status() {
        let store = store(Duration::from_secs(600), 3);
        for id in ["1", "2", "3"] {
            store.reserve(&key(id)).await.unwrap();
        }
        store.commit(&key("1"), CommitOutcome::Sent).await.unwrap();
        store
            .commit(&key("2"), CommitOutcome::FailedPermanent)
            .await
            .unwrap();

        let counts = store.counts().await.unwrap();
        assert_eq!(
            counts,
            DedupCounts {
                pending: 1,
                sent: 1,
                failed_permanent: 1
            }
        );
    }

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let store = store(Duration::from_secs(600), 3);
        assert!(store.get(&key("absent")).await.unwrap().is_none());
    }
}
