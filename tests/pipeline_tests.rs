mod support;

use std::sync::Arc;

use flipper::adapter::outbound::memory::MemoryDedupStore;
use flipper::adapter::outbound::sqlite::SqliteDedupStore;
use flipper::application::pipeline::Disposition;
use flipper::domain::dedup::{DedupStatus, LeasePolicy, ReserveOutcome};
use flipper::domain::evaluation::RiskLevel;
use flipper::domain::id::Source;
use flipper::domain::rule::MatchKind;
use flipper::error::SendError;
use flipper::port::outbound::dedup::DedupStore;
use flipper::testkit::domain::{listing, m6_listing, recipient};
use flipper::testkit::messaging::ScriptedSender;
use flipper::testkit::pipeline::golf_pipeline;
use rust_decimal_macros::dec;

use support::temp_db::TempDb;

fn memory_store() -> Arc<MemoryDedupStore> {
    Arc::new(MemoryDedupStore::default())
}

#[tokio::test]
async fn m6_driver_is_scored_and_alerted() {
    let store = memory_store();
    let sender = Arc::new(ScriptedSender::succeeding());
    let pipeline = golf_pipeline(store.clone(), sender.clone(), dec!(12));

    let outcome = pipeline.evaluate_and_notify(&m6_listing("m6-1")).await.unwrap();

    let evaluation = &outcome.evaluation;
    assert_eq!(evaluation.acquisition_cost, dec!(88));
    assert_eq!(evaluation.estimated_resale_value, dec!(150));
    assert_eq!(evaluation.profit, dec!(62));
    assert_eq!(evaluation.matched_rule_kind, MatchKind::Model);
    assert_eq!(evaluation.matched_value.as_deref(), Some("TaylorMade M6"));
    assert_eq!(evaluation.risk_level, RiskLevel::Low);
    assert_eq!(outcome.disposition, Disposition::Notified { attempts: 1 });

    let sent = sender.attempts();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, recipient());
    assert!(sent[0].body.contains("TaylorMade M6 Driver 10.5"));
    assert!(sent[0].body.contains("Total: £88.00"));
    assert!(sent[0].body.contains("Estimated profit: £62.00"));

    let record = store.get(&evaluation.listing_key).await.unwrap().unwrap();
    assert_eq!(record.status, DedupStatus::Sent);
    assert_eq!(record.attempt_count, 1);
}

#[tokio::test]
async fn listing_seen_twice_is_alerted_once() {
    let sender = Arc::new(ScriptedSender::succeeding());
    let pipeline = golf_pipeline(memory_store(), sender.clone(), dec!(12));
    let listing = m6_listing("m6-2");

    pipeline.evaluate_and_notify(&listing).await.unwrap();
    let second = pipeline.evaluate_and_notify(&listing).await.unwrap();

    assert_eq!(
        second.disposition,
        Disposition::Duplicate(ReserveOutcome::AlreadySent)
    );
    assert_eq!(sender.attempt_count(), 1);
}

#[tokio::test]
async fn below_threshold_listing_leaves_no_trace() {
    let store = memory_store();
    let sender = Arc::new(ScriptedSender::succeeding());
    let pipeline = golf_pipeline(store.clone(), sender.clone(), dec!(12));
    // Default rule: 20 * 1.5 = 30, cost 20, profit 10.
    let cheap = listing(Source::Vinted, "v-1", "Mystery Putter", dec!(20));

    let outcome = pipeline.evaluate_and_notify(&cheap).await.unwrap();

    assert_eq!(outcome.evaluation.profit, dec!(10));
    assert_eq!(outcome.disposition, Disposition::BelowThreshold);
    assert_eq!(sender.attempt_count(), 0);
    assert!(store.is_empty());
}

#[tokio::test]
async fn profit_equal_to_threshold_qualifies() {
    let sender = Arc::new(ScriptedSender::succeeding());
    let pipeline = golf_pipeline(memory_store(), sender.clone(), dec!(62));

    let outcome = pipeline.evaluate_and_notify(&m6_listing("m6-3")).await.unwrap();

    assert_eq!(outcome.disposition, Disposition::Notified { attempts: 1 });
}

#[tokio::test]
async fn exhausted_transient_failures_mark_listing_failed_for_good() {
    let store = memory_store();
    let sender = Arc::new(ScriptedSender::transient_failures(3));
    let pipeline = golf_pipeline(store.clone(), sender.clone(), dec!(12));
    let listing = m6_listing("m6-4");

    let first = pipeline.evaluate_and_notify(&listing).await.unwrap();
    assert!(matches!(first.disposition, Disposition::Failed { attempts: 3, .. }));

    let record = store.get(&listing.key()).await.unwrap().unwrap();
    assert_eq!(record.status, DedupStatus::FailedPermanent);

    let again = pipeline.evaluate_and_notify(&listing).await.unwrap();
    assert_eq!(
        again.disposition,
        Disposition::Duplicate(ReserveOutcome::AlreadyFailed)
    );
    assert_eq!(sender.attempt_count(), 3);
}

#[tokio::test]
async fn permanent_failure_is_not_retried() {
    let sender = Arc::new(ScriptedSender::with_results([Err(SendError::Permanent(
        "recipient not on WhatsApp".into(),
    ))]));
    let pipeline = golf_pipeline(memory_store(), sender.clone(), dec!(12));

    let outcome = pipeline.evaluate_and_notify(&m6_listing("m6-5")).await.unwrap();

    match outcome.disposition {
        Disposition::Failed { attempts, reason } => {
            assert_eq!(attempts, 1);
            assert!(reason.contains("recipient not on WhatsApp"));
        }
        other => panic!("expected failure, got {other}"),
    }
    assert_eq!(sender.attempt_count(), 1);
}

#[tokio::test]
async fn concurrent_sightings_send_exactly_once() {
    let sender = Arc::new(ScriptedSender::succeeding());
    let pipeline = Arc::new(golf_pipeline(memory_store(), sender.clone(), dec!(12)));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move {
                pipeline
                    .evaluate_and_notify(&m6_listing("m6-race"))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut notified = 0;
    for task in tasks {
        if let Disposition::Notified { .. } = task.await.unwrap().disposition {
            notified += 1;
        }
    }

    assert_eq!(notified, 1);
    assert_eq!(sender.attempt_count(), 1);
}

#[tokio::test]
async fn test_alert_bypasses_dedup_and_threshold() {
    let store = memory_store();
    let sender = Arc::new(ScriptedSender::succeeding());
    let pipeline = golf_pipeline(store.clone(), sender.clone(), dec!(1000));
    let listing = m6_listing("m6-test");

    let first = pipeline.send_test_alert(&listing).await;
    let second = pipeline.send_test_alert(&listing).await;

    assert_eq!(first.disposition, Disposition::Notified { attempts: 1 });
    assert_eq!(second.disposition, Disposition::Notified { attempts: 1 });
    assert_eq!(sender.attempt_count(), 2);
    assert!(store.is_empty());
}

#[tokio::test]
async fn sent_state_survives_restart() {
    let db = TempDb::create();
    let listing = m6_listing("m6-restart");

    {
        let store = Arc::new(SqliteDedupStore::new(db.pool(), LeasePolicy::default()));
        let sender = Arc::new(ScriptedSender::succeeding());
        let pipeline = golf_pipeline(store, sender.clone(), dec!(12));
        pipeline.evaluate_and_notify(&listing).await.unwrap();
        assert_eq!(sender.attempt_count(), 1);
    }

    let store = Arc::new(SqliteDedupStore::new(db.pool(), LeasePolicy::default()));
    let sender = Arc::new(ScriptedSender::succeeding());
    let pipeline = golf_pipeline(store, sender.clone(), dec!(12));
    let outcome = pipeline.evaluate_and_notify(&listing).await.unwrap();

    assert_eq!(
        outcome.disposition,
        Disposition::Duplicate(ReserveOutcome::AlreadySent)
    );
    assert_eq!(sender.attempt_count(), 0);
}
