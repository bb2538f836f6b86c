//! Per-listing sequence: evaluate, filter, reserve, send, commit.
//!
//! Reservation happens before the send and the commit after it. A crash in
//! between leaves the record pending; it is re-claimed once its lease expires
//! and the listing is seen again, trading a small duplicate window for never
//! losing a qualifying alert.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::notify::{format_alert, AlertNotifier, Delivery};
use super::rules::{RuleEngine, SharedRuleBook};
use crate::domain::dedup::{CommitOutcome, ReserveOutcome};
use crate::domain::evaluation::Evaluation;
use crate::domain::listing::Listing;
use crate::domain::money::Money;
use crate::domain::notification::{Msisdn, NotificationRequest};
use crate::error::Result;
use crate::port::outbound::dedup::DedupStore;

/// What happened to one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Profit under the threshold; nothing stored or sent.
    BelowThreshold,
    /// Already handled or in flight elsewhere.
    Duplicate(ReserveOutcome),
    Notified { attempts: u32 },
    /// Delivery gave up; recorded as failed permanently.
    Failed { attempts: u32, reason: String },
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowThreshold => f.write_str("below threshold"),
            Self::Duplicate(outcome) => write!(f, "duplicate ({outcome})"),
            Self::Notified { attempts } => write!(f, "notified after {attempts} attempt(s)"),
            Self::Failed { attempts, reason } => {
                write!(f, "failed after {attempts} attempt(s): {reason}")
            }
        }
    }
}

impl From<Delivery> for Disposition {
    fn from(delivery: Delivery) -> Self {
        match delivery {
            Delivery::Delivered { attempts } => Self::Notified { attempts },
            Delivery::Failed { attempts, reason } => Self::Failed { attempts, reason },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingOutcome {
    pub evaluation: Evaluation,
    pub disposition: Disposition,
}

/// Core entry point shared by the scheduler and manual triggers.
pub struct Pipeline {
    rules: SharedRuleBook,
    store: Arc<dyn DedupStore>,
    notifier: Arc<AlertNotifier>,
    recipient: Msisdn,
    profit_threshold: Money,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        rules: SharedRuleBook,
        store: Arc<dyn DedupStore>,
        notifier: Arc<AlertNotifier>,
        recipient: Msisdn,
        profit_threshold: Money,
    ) -> Self {
        Self {
            rules,
            store,
            notifier,
            recipient,
            profit_threshold,
        }
    }

    #[must_use]
    pub fn rules(&self) -> &SharedRuleBook {
        &self.rules
    }

    #[must_use]
    pub fn profit_threshold(&self) -> Money {
        self.profit_threshold
    }

    /// Score a listing against the current rules without side effects.
    #[must_use]
    pub fn evaluate(&self, listing: &Listing) -> Evaluation {
        self.rules.snapshot().engine.evaluate(listing)
    }

    /// Evaluate a listing and, if it qualifies and has not been handled,
    /// notify exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error only when the dedup store fails; delivery failures
    /// are reported through [`Disposition::Failed`].
    pub async fn evaluate_and_notify(&self, listing: &Listing) -> Result<ListingOutcome> {
        let book = self.rules.snapshot();
        self.process(&book.engine, listing).await
    }

    /// Same as [`Pipeline::evaluate_and_notify`] with a caller-held engine,
    /// so a whole cycle runs against one rule snapshot.
    pub async fn process(&self, engine: &RuleEngine, listing: &Listing) -> Result<ListingOutcome> {
        let evaluation = engine.evaluate(listing);
        let key = &evaluation.listing_key;

        if !evaluation.qualifies(self.profit_threshold) {
            debug!(listing = %key, profit = %evaluation.profit, "Below profit threshold");
            return Ok(ListingOutcome {
                evaluation,
                disposition: Disposition::BelowThreshold,
            });
        }

        let reservation = self.store.reserve(key).await?;
        if !reservation.is_claimed() {
            debug!(listing = %key, outcome = %reservation, "Skipping duplicate listing");
            return Ok(ListingOutcome {
                evaluation,
                disposition: Disposition::Duplicate(reservation),
            });
        }
        if let ReserveOutcome::Resumed { attempt } = reservation {
            info!(listing = %key, attempt, "Resuming interrupted alert");
        }

        let request = NotificationRequest {
            recipient: self.recipient.clone(),
            message: format_alert(listing, &evaluation),
            listing_key: key.clone(),
        };
        let delivery = self.notifier.send(&request).await;
        let commit = if delivery.is_delivered() {
            CommitOutcome::Sent
        } else {
            CommitOutcome::FailedPermanent
        };

        if !self.store.commit(key, commit).await? {
            warn!(listing = %key, status = %commit.status(), "Dedup record was no longer pending at commit");
        }

        let disposition = Disposition::from(delivery);
        info!(
            listing = %key,
            profit = %evaluation.profit,
            risk = %evaluation.risk_level,
            rule = %evaluation.matched_rule_kind,
            result = %disposition,
            "Qualifying listing processed"
        );

        Ok(ListingOutcome {
            evaluation,
            disposition,
        })
    }

    /// Send an alert for `listing` regardless of threshold or dedup state.
    pub async fn send_test_alert(&self, listing: &Listing) -> ListingOutcome {
        let evaluation = self.evaluate(listing);
        let request = NotificationRequest {
            recipient: self.recipient.clone(),
            message: format_alert(listing, &evaluation),
            listing_key: evaluation.listing_key.clone(),
        };
        let delivery = self.notifier.send(&request).await;
        info!(listing = %evaluation.listing_key, delivered = delivery.is_delivered(), "Test alert sent");
        ListingOutcome {
            evaluation,
            disposition: delivery.into(),
        }
    }
}
