use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("environment variable {name} is not set")]
    MissingEnv { name: String },
}

/// Failures while querying a marketplace.
///
/// Adapters never retry; the scheduler consults [`FetchError::is_transient`]
/// to decide whether another attempt is worthwhile.
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("quota exceeded: {0}")]
    Quota(String),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Whether a later attempt may succeed without operator action.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout | Self::Quota(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Auth(_) | Self::Decode(_) => false,
        }
    }

    /// Classify a non-success HTTP status.
    #[must_use]
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Auth(body),
            429 => Self::Quota(body),
            _ => Self::Status { status, body },
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::from_status(status.as_u16(), err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// A raw listing could not be turned into a [`Listing`](crate::domain::listing::Listing).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizationError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("unsupported currency {found} (expected {expected})")]
    UnsupportedCurrency { found: String, expected: String },
}

/// Failures reported by the messaging provider for a single send.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// Timeouts, connection failures, throttling and 5xx responses.
    #[error("transient send failure: {0}")]
    Transient(String),

    /// Rejected request; retrying will not help.
    #[error("permanent send failure: {0}")]
    Permanent(String),
}

impl SendError {
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error(transparent)]
    Send(#[from] SendError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),
}

impl Error {
    /// True when the failure came from the dedup storage layer.
    ///
    /// Storage failures abort a whole cycle rather than a single listing.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Database(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_transience() {
        assert!(FetchError::Timeout.is_transient());
        assert!(FetchError::Network("reset".into()).is_transient());
        assert!(FetchError::Quota("slow down".into()).is_transient());
        assert!(FetchError::Status {
            status: 503,
            body: String::new()
        }
        .is_transient());
        assert!(!FetchError::Status {
            status: 404,
            body: String::new()
        }
        .is_transient());
        assert!(!FetchError::Auth("expired".into()).is_transient());
        assert!(!FetchError::Decode("eof".into()).is_transient());
    }

    #[test]
    fn fetch_error_from_status_classifies_auth_and_quota() {
        assert!(matches!(
            FetchError::from_status(401, "no".into()),
            FetchError::Auth(_)
        ));
        assert!(matches!(
            FetchError::from_status(403, "no".into()),
            FetchError::Auth(_)
        ));
        assert!(matches!(
            FetchError::from_status(429, "later".into()),
            FetchError::Quota(_)
        ));
        assert!(matches!(
            FetchError::from_status(500, "boom".into()),
            FetchError::Status { status: 500, .. }
        ));
    }

    #[test]
    fn storage_errors_are_flagged() {
        assert!(Error::Database("locked".into()).is_storage());
        assert!(Error::Connection("pool".into()).is_storage());
        assert!(!Error::Parse("x".into()).is_storage());
    }
}
