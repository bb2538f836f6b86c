//! Database row types for Diesel ORM.

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;

use super::schema::listing_alerts;
use crate::domain::dedup::{DedupRecord, DedupStatus};
use crate::domain::id::{ListingKey, Source};
use crate::error::{Error, Result};

/// Row in `listing_alerts`.
///
/// Timestamps are RFC 3339 UTC with millisecond precision, so lexical order
/// matches chronological order and range filters work on the text column.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = listing_alerts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AlertRow {
    pub source: String,
    pub external_id: String,
    pub status: String,
    pub first_seen_at: String,
    pub last_attempt_at: String,
    pub attempt_count: i32,
}

impl AlertRow {
    /// Row for a key reserved for the first time.
    #[must_use]
    pub fn pending(key: &ListingKey, now: DateTime<Utc>) -> Self {
        let stamp = timestamp(now);
        Self {
            source: key.source().as_str().to_string(),
            external_id: key.external_id().to_string(),
            status: DedupStatus::Pending.as_str().to_string(),
            first_seen_at: stamp.clone(),
            last_attempt_at: stamp,
            attempt_count: 1,
        }
    }

    /// Convert back into a domain record.
    ///
    /// # Errors
    /// Returns [`Error::Parse`] if a stored column does not decode.
    pub fn into_record(self) -> Result<DedupRecord> {
        let source: Source = self.source.parse().map_err(Error::Parse)?;
        let status: DedupStatus = self.status.parse().map_err(Error::Parse)?;
        Ok(DedupRecord {
            key: ListingKey::new(source, self.external_id),
            status,
            first_seen_at: parse_timestamp(&self.first_seen_at)?,
            last_attempt_at: parse_timestamp(&self.last_attempt_at)?,
            attempt_count: u32::try_from(self.attempt_count)
                .map_err(|e| Error::Parse(e.to_string()))?,
        })
    }
}

/// Stored form of a timestamp.
#[must_use]
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Parse(e.to_string()))
}
