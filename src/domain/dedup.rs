//! Notification bookkeeping for listings that crossed the profit threshold.
//!
//! A [`DedupRecord`] moves `pending -> sent` or `pending -> failed_permanent`
//! exactly once. Terminal records are never reopened, so a listing is never
//! notified twice no matter how many cycles or restarts see it again.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ListingKey;

/// Lifecycle status of a dedup record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupStatus {
    /// Reserved; a send is in flight or was interrupted.
    Pending,
    /// Alert delivered.
    Sent,
    /// Delivery gave up; never retried.
    FailedPermanent,
}

impl DedupStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::FailedPermanent => "failed_permanent",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for DedupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DedupStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "sent" => Ok(Self::Sent),
            "failed_permanent" => Ok(Self::FailedPermanent),
            other => Err(format!("unknown dedup status: {other}")),
        }
    }
}

/// Persisted notification state for one listing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupRecord {
    pub key: ListingKey,
    pub status: DedupStatus,
    pub first_seen_at: DateTime<Utc>,
    pub last_attempt_at: DateTime<Utc>,
    /// Number of times the key was claimed for sending.
    pub attempt_count: u32,
}

impl DedupRecord {
    /// Fresh record created by the first successful reservation.
    #[must_use]
    pub fn pending(key: ListingKey, now: DateTime<Utc>) -> Self {
        Self {
            key,
            status: DedupStatus::Pending,
            first_seen_at: now,
            last_attempt_at: now,
            attempt_count: 1,
        }
    }

    /// Apply a reservation attempt to an existing record.
    ///
    /// Reclaims an abandoned pending record when its lease has expired and
    /// attempts remain, and retires one whose attempts are exhausted.
    pub fn reserve_existing(&mut self, now: DateTime<Utc>, policy: &LeasePolicy) -> ReserveOutcome {
        match self.status {
            DedupStatus::Sent => ReserveOutcome::AlreadySent,
            DedupStatus::FailedPermanent => ReserveOutcome::AlreadyFailed,
            DedupStatus::Pending if !policy.is_expired(self.last_attempt_at, now) => {
                ReserveOutcome::AlreadyPending
            }
            DedupStatus::Pending if self.attempt_count >= policy.max_attempts => {
                self.status = DedupStatus::FailedPermanent;
                ReserveOutcome::AlreadyFailed
            }
            DedupStatus::Pending => {
                self.attempt_count += 1;
                self.last_attempt_at = now;
                ReserveOutcome::Resumed {
                    attempt: self.attempt_count,
                }
            }
        }
    }
}

/// Rules for reclaiming pending reservations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeasePolicy {
    /// How long a pending reservation is protected from other claimants.
    pub lease: Duration,
    /// Maximum number of claims before the key is retired.
    pub max_attempts: u32,
}

impl LeasePolicy {
    #[must_use]
    pub const fn new(lease: Duration, max_attempts: u32) -> Self {
        Self {
            lease,
            max_attempts,
        }
    }

    /// Latest `last_attempt_at` that counts as abandoned at `now`.
    #[must_use]
    pub fn expiry_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let lease = chrono::Duration::from_std(self.lease).unwrap_or(chrono::Duration::MAX);
        now.checked_sub_signed(lease).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    #[must_use]
    pub fn is_expired(&self, last_attempt_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        last_attempt_at <= self.expiry_cutoff(now)
    }
}

impl Default for LeasePolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(600), 3)
    }
}

/// Result of [`reserve`](crate::port::outbound::dedup::DedupStore::reserve).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ReserveOutcome {
    /// First sighting; the caller owns the send.
    New,
    /// Abandoned reservation reclaimed; the caller owns the send.
    Resumed { attempt: u32 },
    /// Another pipeline holds a live reservation.
    AlreadyPending,
    AlreadySent,
    AlreadyFailed,
}

impl ReserveOutcome {
    /// Whether the caller must send and then commit.
    #[must_use]
    pub const fn is_claimed(self) -> bool {
        matches!(self, Self::New | Self::Resumed { .. })
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Resumed { .. } => "resumed",
            Self::AlreadyPending => "already_pending",
            Self::AlreadySent => "already_sent",
            Self::AlreadyFailed => "already_failed",
        }
    }
}

impl fmt::Display for ReserveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resumed { attempt } => write!(f, "resumed (attempt {attempt})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Terminal outcome recorded by `commit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Sent,
    FailedPermanent,
}

impl CommitOutcome {
    #[must_use]
    pub const fn status(self) -> DedupStatus {
        match self {
            Self::Sent => DedupStatus::Sent,
            Self::FailedPermanent => DedupStatus::FailedPermanent,
        }
    }
}

/// Per-status record totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DedupCounts {
    pub pending: u64,
    pub sent: u64,
    pub failed_permanent: u64,
}

impl DedupCounts {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.pending + self.sent + self.failed_permanent
    }

    pub fn add(&mut self, status: DedupStatus, count: u64) {
        match status {
            DedupStatus::Pending => self.pending += count,
            DedupStatus::Sent => self.sent += count,
            DedupStatus::FailedPermanent => self.failed_permanent += count,
        }
    }
}
