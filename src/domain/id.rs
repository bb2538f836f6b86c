//! Listing identity types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Marketplace a listing originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// eBay Browse API.
    Ebay,
    /// Vinted catalog API.
    Vinted,
    /// Operator-supplied listing (test alerts, ad-hoc evaluation).
    Manual,
}

impl Source {
    /// Stable lowercase name used in logs and persisted keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ebay => "ebay",
            Self::Vinted => "vinted",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ebay" => Ok(Self::Ebay),
            "vinted" => Ok(Self::Vinted),
            "manual" => Ok(Self::Manual),
            other => Err(format!("unknown source: {other}")),
        }
    }
}

/// Natural key of a listing: unique per marketplace and stable across cycles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListingKey {
    source: Source,
    external_id: String,
}

impl ListingKey {
    /// Create a key from a source and the marketplace's own item id.
    pub fn new(source: Source, external_id: impl Into<String>) -> Self {
        Self {
            source,
            external_id: external_id.into(),
        }
    }

    #[must_use]
    pub const fn source(&self) -> Source {
        self.source
    }

    #[must_use]
    pub fn external_id(&self) -> &str {
        &self.external_id
    }
}

impl fmt::Display for ListingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.external_id)
    }
}
