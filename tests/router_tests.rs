mod common;

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;

use fintrack::bot::{CommandRouter, LinkService};
use fintrack_config::Config;
use fintrack_core::{Clock, FinanceStore, FixedClock, TransactionService};
use fintrack_domain::User;
use fintrack_storage_json::JsonStore;

const CHAT: i64 = 42;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 10).unwrap()
}

fn fixture() -> (Arc<JsonStore>, CommandRouter, User) {
    let store = Arc::new(JsonStore::in_memory());
    let user = common::linked_user(&store, "alice", CHAT);
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::at_date(today()));
    let router = CommandRouter::new(store.clone(), clock, Config::default());
    (store, router, user)
}

#[test]
fn today_command_reports_both_totals() {
    let (store, router, user) = fixture();
    common::income_category(&store, &user, "Salary");
    common::expense_category(&store, &user, "Food");
    TransactionService::record(store.as_ref(), user.id, dec!(50000), today(), "Salary", "")
        .expect("record income");
    TransactionService::record(store.as_ref(), user.id, dec!(700.50), today(), "Food", "")
        .expect("record expense");

    let reply = router.handle(CHAT, "/today");
    assert!(reply.contains("Report for today"), "reply: {reply}");
    assert!(reply.contains("Income: 50000.00 ₽"), "reply: {reply}");
    assert!(reply.contains("Expenses: 700.50 ₽"), "reply: {reply}");
}

#[test]
fn unlinked_chat_gets_the_not_linked_reply() {
    let (_store, router, _user) = fixture();
    let reply = router.handle(999, "/today");
    assert!(reply.contains("not linked"), "reply: {reply}");
}

#[test]
fn add_records_and_echoes_the_canonical_category_name() {
    let (store, router, user) = fixture();
    common::expense_category(&store, &user, "Food");

    let reply = router.handle(CHAT, "/add 500 food lunch");
    assert_eq!(reply, "✅ Recorded: 500.00 ₽ (Food)");

    let reply = router.handle(CHAT, "/add lunch Food");
    assert!(reply.contains("Invalid amount"), "reply: {reply}");

    let reply = router.handle(CHAT, "/add -5 Food");
    assert!(reply.contains("Invalid amount"), "reply: {reply}");
}

#[test]
fn add_with_unknown_category_lists_options_and_suggests() {
    let (store, router, user) = fixture();
    common::expense_category(&store, &user, "Food");
    common::expense_category(&store, &user, "Transport");

    let reply = router.handle(CHAT, "/add 300 Tansport bus");
    assert!(reply.contains("not found"), "reply: {reply}");
    assert!(
        reply.contains("Available categories: Food, Transport"),
        "reply: {reply}"
    );
    assert!(reply.contains("Did you mean 'Transport'?"), "reply: {reply}");
}

#[test]
fn budget_command_saves_plan_and_appends_analysis() {
    let (store, router, user) = fixture();
    common::income_category(&store, &user, "Salary");
    common::expense_category(&store, &user, "Food");
    TransactionService::record(store.as_ref(), user.id, dec!(60000), today(), "Salary", "")
        .expect("record income");
    TransactionService::record(store.as_ref(), user.id, dec!(3000), today(), "Food", "")
        .expect("record expense");

    let reply = router.handle(CHAT, "/budget 50000 10000");
    assert!(reply.contains("Budget for 2025-09 saved"), "reply: {reply}");
    assert!(reply.contains("Income: 50000.00 ₽"), "reply: {reply}");
    assert!(reply.contains("📊 Budget analysis:"), "reply: {reply}");
    assert!(
        reply.contains("Income exceeded the plan by 10000.00 ₽"),
        "reply: {reply}"
    );
    assert!(reply.contains("stay within the budget"), "reply: {reply}");

    let reply = router.handle(CHAT, "/budget 50000 -1");
    assert!(reply.contains("Invalid amount"), "reply: {reply}");
}

#[test]
fn start_with_fresh_token_links_the_chat() {
    let (store, router, _user) = fixture();
    let bob = User::new("bob");
    store.add_user(bob.clone()).expect("add bob");

    let clock: Arc<dyn Clock> = Arc::new(FixedClock::at_date(today()));
    let links = LinkService::new(store.clone(), clock);
    let token = links.issue(bob.id).expect("issue token");

    let reply = router.handle(77, &format!("/start {}", token.token));
    assert!(reply.contains("Account linked successfully"), "reply: {reply}");

    let linked = store
        .user_by_telegram(77)
        .expect("lookup by chat")
        .expect("bob is linked");
    assert_eq!(linked.username, "bob");

    // The token is single-use.
    let reply = router.handle(78, &format!("/start {}", token.token));
    assert!(reply.contains("finance assistant"), "reply: {reply}");
}

#[test]
fn start_with_stale_token_reports_expiry() {
    let (store, router, _user) = fixture();
    let bob = User::new("bob");
    store.add_user(bob.clone()).expect("add bob");

    let ten_minutes_ago = Utc.with_ymd_and_hms(2025, 9, 10, 11, 50, 0).unwrap();
    let old_clock: Arc<dyn Clock> = Arc::new(FixedClock(ten_minutes_ago));
    let links = LinkService::new(store.clone(), old_clock);
    let token = links.issue(bob.id).expect("issue token");

    let reply = router.handle(77, &format!("/start {}", token.token));
    assert!(reply.contains("link has expired"), "reply: {reply}");
    assert!(store
        .user_by_telegram(77)
        .expect("lookup by chat")
        .is_none());
}

#[test]
fn linked_chat_gets_a_welcome_back() {
    let (_store, router, user) = fixture();
    let reply = router.handle(CHAT, "/start");
    assert!(reply.contains(&format!("Welcome back, {}", user.username)));
}

#[test]
fn unknown_commands_come_with_a_suggestion() {
    let (_store, router, _user) = fixture();
    let reply = router.handle(CHAT, "/tody");
    assert!(reply.contains("Unknown command /tody"), "reply: {reply}");
    assert!(reply.contains("Did you mean /today?"), "reply: {reply}");
}

#[test]
fn comparison_commands_render_both_windows() {
    let (store, router, user) = fixture();
    common::expense_category(&store, &user, "Food");
    TransactionService::record(
        store.as_ref(),
        user.id,
        dec!(400),
        NaiveDate::from_ymd_opt(2025, 9, 9).unwrap(),
        "Food",
        "",
    )
    .expect("this week");
    TransactionService::record(
        store.as_ref(),
        user.id,
        dec!(150),
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
        "Food",
        "",
    )
    .expect("previous week");

    let reply = router.handle(CHAT, "/compare");
    assert!(reply.contains("This week: 400.00 ₽"), "reply: {reply}");
    assert!(reply.contains("Last week: 150.00 ₽"), "reply: {reply}");
    assert!(reply.contains("You spent 250.00 ₽ more"), "reply: {reply}");
}

#[test]
fn detail_command_groups_today_by_category() {
    let (store, router, user) = fixture();
    common::expense_category(&store, &user, "Food");
    common::expense_category(&store, &user, "Transport");
    TransactionService::record(store.as_ref(), user.id, dec!(120.55), today(), "Food", "")
        .expect("food");
    TransactionService::record(store.as_ref(), user.id, dec!(60), today(), "Transport", "")
        .expect("transport");

    let reply = router.handle(CHAT, "/detail");
    assert!(reply.contains("• Food: 120.55 ₽"), "reply: {reply}");
    assert!(reply.contains("• Transport: 60.00 ₽"), "reply: {reply}");
}
