mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use fintrack::bot::DigestJob;
use fintrack_core::{Clock, FixedClock, TransactionService};
use fintrack_storage_json::JsonStore;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 20).unwrap()
}

fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::at_date(today()))
}

#[test]
fn run_once_delivers_to_every_recipient() {
    let store = Arc::new(JsonStore::in_memory());
    let alice = common::linked_user(&store, "alice", 1);
    let bob = common::linked_user(&store, "bob", 2);
    common::expense_category(&store, &alice, "Food");
    common::expense_category(&store, &bob, "Food");
    TransactionService::record(store.as_ref(), alice.id, dec!(120.55), today(), "Food", "")
        .expect("alice spent");
    TransactionService::record(store.as_ref(), bob.id, dec!(40), today(), "Food", "")
        .expect("bob spent");

    let sender = Arc::new(common::RecordingSender::default());
    let job = DigestJob::new(store, clock(), sender.clone(), 9, "₽");

    assert_eq!(job.run_once(), 2);
    let sent = sender.sent.lock().expect("lock recorded messages");
    assert_eq!(sent.len(), 2);
    let alice_line = &sent.iter().find(|(chat, _)| *chat == 1).expect("alice").1;
    assert!(alice_line.contains("Spent today: 120.55 ₽"));
    let bob_line = &sent.iter().find(|(chat, _)| *chat == 2).expect("bob").1;
    assert!(bob_line.contains("Spent today: 40.00 ₽"));
}

#[test]
fn one_failed_delivery_does_not_abort_the_batch() {
    let store = Arc::new(JsonStore::in_memory());
    let alice = common::linked_user(&store, "alice", 1);
    let bob = common::linked_user(&store, "bob", 2);
    common::expense_category(&store, &alice, "Food");
    common::expense_category(&store, &bob, "Food");
    TransactionService::record(store.as_ref(), alice.id, dec!(10), today(), "Food", "")
        .expect("alice spent");
    TransactionService::record(store.as_ref(), bob.id, dec!(20), today(), "Food", "")
        .expect("bob spent");

    let sender = Arc::new(common::FlakySender::rejecting(1));
    let job = DigestJob::new(store, clock(), sender.clone(), 9, "₽");

    assert_eq!(job.run_once(), 1);
    let sent = sender.sent.lock().expect("lock sent chats");
    assert_eq!(*sent, vec![2]);
}

#[test]
fn users_without_spending_still_get_a_zero_line() {
    let store = Arc::new(JsonStore::in_memory());
    common::linked_user(&store, "alice", 1);

    let sender = Arc::new(common::RecordingSender::default());
    let job = DigestJob::new(store, clock(), sender.clone(), 9, "₽");

    assert_eq!(job.run_once(), 1);
    let sent = sender.sent.lock().expect("lock recorded messages");
    assert!(sent[0].1.contains("Spent today: 0.00 ₽"));
}

#[test]
fn start_and_stop_manage_the_worker_lifecycle() {
    let store = Arc::new(JsonStore::in_memory());
    let sender = Arc::new(common::RecordingSender::default());
    let mut job = DigestJob::new(store, clock(), sender, 9, "₽");

    assert!(!job.is_running());
    job.start();
    assert!(job.is_running());
    // A second start must not spawn a second worker.
    job.start();
    assert!(job.is_running());
    job.stop();
    assert!(!job.is_running());
    // Stopping an idle job is a no-op.
    job.stop();
}
