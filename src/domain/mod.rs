//! Marketplace-agnostic domain types: listings, rules, evaluations and
//! notification bookkeeping. Nothing here performs I/O.

pub mod dedup;
pub mod error;
pub mod evaluation;
pub mod id;
pub mod listing;
pub mod money;
pub mod notification;
pub mod rule;

pub use dedup::{CommitOutcome, DedupCounts, DedupRecord, DedupStatus, LeasePolicy, ReserveOutcome};
pub use error::DomainError;
pub use evaluation::{Evaluation, RiskLevel};
pub use id::{ListingKey, Source};
pub use listing::{Listing, RawListing};
pub use money::Money;
pub use notification::{Msisdn, NotificationRequest};
pub use rule::{MatchKind, ResaleValue, Rule, RuleSet};
