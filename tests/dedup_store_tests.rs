mod support;

use std::sync::Arc;
use std::time::Duration;

use flipper::adapter::outbound::memory::MemoryDedupStore;
use flipper::adapter::outbound::sqlite::SqliteDedupStore;
use flipper::application::pipeline::Disposition;
use flipper::domain::dedup::{CommitOutcome, DedupStatus, LeasePolicy, ReserveOutcome};
use flipper::domain::id::{ListingKey, Source};
use flipper::port::outbound::dedup::DedupStore;
use flipper::testkit::domain::m6_listing;
use flipper::testkit::messaging::ScriptedSender;
use flipper::testkit::pipeline::golf_pipeline;
use rust_decimal_macros::dec;

use support::temp_db::TempDb;

fn key(id: &str) -> ListingKey {
    ListingKey::new(Source::Ebay, id)
}

/// Behaviour every store must share.
async fn assert_lifecycle(store: &dyn DedupStore) {
    assert_eq!(store.reserve(&key("a")).await.unwrap(), ReserveOutcome::New);
    assert_eq!(
        store.reserve(&key("a")).await.unwrap(),
        ReserveOutcome::AlreadyPending
    );
    assert!(store.commit(&key("a"), CommitOutcome::Sent).await.unwrap());
    assert_eq!(
        store.reserve(&key("a")).await.unwrap(),
        ReserveOutcome::AlreadySent
    );

    assert_eq!(store.reserve(&key("b")).await.unwrap(), ReserveOutcome::New);
    assert!(store
        .commit(&key("b"), CommitOutcome::FailedPermanent)
        .await
        .unwrap());
    assert!(!store.commit(&key("b"), CommitOutcome::Sent).await.unwrap());

    assert!(!store.commit(&key("never-seen"), CommitOutcome::Sent).await.unwrap());
    assert!(store.get(&key("never-seen")).await.unwrap().is_none());

    assert_eq!(store.reserve(&key("c")).await.unwrap(), ReserveOutcome::New);

    let counts = store.counts().await.unwrap();
    assert_eq!(counts.sent, 1);
    assert_eq!(counts.failed_permanent, 1);
    assert_eq!(counts.pending, 1);
    assert_eq!(counts.total(), 3);
}

#[tokio::test]
async fn memory_store_lifecycle() {
    assert_lifecycle(&MemoryDedupStore::default()).await;
}

#[tokio::test]
async fn sqlite_store_lifecycle() {
    let db = TempDb::create();
    assert_lifecycle(&SqliteDedupStore::new(db.pool(), LeasePolicy::default())).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sqlite_reservations_have_one_winner() {
    let db = TempDb::create();
    // Separate pools behave like separate processes sharing the file.
    let stores: Vec<Arc<SqliteDedupStore>> = (0..4)
        .map(|_| Arc::new(SqliteDedupStore::new(db.pool(), LeasePolicy::default())))
        .collect();

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let store = Arc::clone(&stores[i % stores.len()]);
            tokio::spawn(async move { store.reserve(&key("contested")).await.unwrap() })
        })
        .collect();

    let mut claims = 0;
    for task in tasks {
        let outcome = task.await.unwrap();
        if outcome.is_claimed() {
            claims += 1;
        } else {
            assert_eq!(outcome, ReserveOutcome::AlreadyPending);
        }
    }
    assert_eq!(claims, 1);
}

#[tokio::test]
async fn interrupted_send_is_resumed_after_restart() {
    let db = TempDb::create();
    let listing = m6_listing("crashed");

    // First process reserved the key, then died before sending.
    {
        let store = SqliteDedupStore::new(db.pool(), LeasePolicy::default());
        assert_eq!(store.reserve(&listing.key()).await.unwrap(), ReserveOutcome::New);
    }

    let store = Arc::new(SqliteDedupStore::new(db.pool(), LeasePolicy::default()));
    assert_eq!(store.recover_abandoned().await.unwrap(), 1);

    let sender = Arc::new(ScriptedSender::succeeding());
    let pipeline = golf_pipeline(store.clone(), sender.clone(), dec!(12));
    let outcome = pipeline.evaluate_and_notify(&listing).await.unwrap();

    assert_eq!(outcome.disposition, Disposition::Notified { attempts: 1 });
    assert_eq!(sender.attempt_count(), 1);

    let record = store.get(&listing.key()).await.unwrap().unwrap();
    assert_eq!(record.status, DedupStatus::Sent);
    assert_eq!(record.attempt_count, 2);
}

#[tokio::test]
async fn live_lease_blocks_a_second_process() {
    let db = TempDb::create();
    let first = SqliteDedupStore::new(db.pool(), LeasePolicy::new(Duration::from_secs(600), 3));
    let second = SqliteDedupStore::new(db.pool(), LeasePolicy::new(Duration::from_secs(600), 3));

    assert_eq!(first.reserve(&key("leased")).await.unwrap(), ReserveOutcome::New);
    assert_eq!(
        second.reserve(&key("leased")).await.unwrap(),
        ReserveOutcome::AlreadyPending
    );
}

#[tokio::test]
async fn abandoned_key_is_retired_once_attempts_run_out() {
    let db = TempDb::create();
    let store = SqliteDedupStore::new(db.pool(), LeasePolicy::new(Duration::from_secs(600), 2));

    assert_eq!(store.reserve(&key("flaky")).await.unwrap(), ReserveOutcome::New);
    store.recover_abandoned().await.unwrap();
    assert_eq!(
        store.reserve(&key("flaky")).await.unwrap(),
        ReserveOutcome::Resumed { attempt: 2 }
    );
    store.recover_abandoned().await.unwrap();
    assert_eq!(
        store.reserve(&key("flaky")).await.unwrap(),
        ReserveOutcome::AlreadyFailed
    );

    let record = store.get(&key("flaky")).await.unwrap().unwrap();
    assert_eq!(record.status, DedupStatus::FailedPermanent);
}
