use std::path::PathBuf;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use tempfile::TempDir;

use fintrack::bot::{MessageSender, SendError};
use fintrack_core::FinanceStore;
use fintrack_domain::{Category, CategoryKind, User};
use fintrack_storage_json::JsonStore;

/// Holds TempDir guards so temporary folders live for the duration of the
/// test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A unique home directory for one CLI invocation.
pub fn isolated_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Creates a user already linked to the given chat.
pub fn linked_user(store: &JsonStore, name: &str, chat_id: i64) -> User {
    let mut user = User::new(name);
    user.link_telegram(chat_id);
    store.add_user(user.clone()).expect("add linked user");
    user
}

pub fn expense_category(store: &JsonStore, user: &User, name: &str) -> Category {
    let category = Category::new(user.id, name, CategoryKind::Expense);
    store.add_category(category.clone()).expect("add category");
    category
}

pub fn income_category(store: &JsonStore, user: &User, name: &str) -> Category {
    let category = Category::new(user.id, name, CategoryKind::Income);
    store.add_category(category.clone()).expect("add category");
    category
}

/// Captures every delivered message.
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<(i64, String)>>,
}

impl MessageSender for RecordingSender {
    fn send(&self, chat_id: i64, text: &str) -> Result<(), SendError> {
        self.sent
            .lock()
            .expect("lock recorded messages")
            .push((chat_id, text.to_string()));
        Ok(())
    }
}

/// Rejects deliveries to one chat and records the rest.
pub struct FlakySender {
    pub reject_chat: i64,
    pub sent: Mutex<Vec<i64>>,
}

impl FlakySender {
    pub fn rejecting(chat_id: i64) -> Self {
        Self {
            reject_chat: chat_id,
            sent: Mutex::new(Vec::new()),
        }
    }
}

impl MessageSender for FlakySender {
    fn send(&self, chat_id: i64, _text: &str) -> Result<(), SendError> {
        if chat_id == self.reject_chat {
            return Err(SendError("chat unavailable".into()));
        }
        self.sent.lock().expect("lock sent chats").push(chat_id);
        Ok(())
    }
}
