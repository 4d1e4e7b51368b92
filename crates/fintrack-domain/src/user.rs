//! Account model shared by the web front end and the chat interface.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// A registered account. All other entities are scoped to exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_id: Option<i64>,
    #[serde(default)]
    pub telegram_linked: bool,
    #[serde(default = "User::default_send_daily_report")]
    pub send_daily_report: bool,
    #[serde(default = "User::default_send_weekly_report")]
    pub send_weekly_report: bool,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            telegram_id: None,
            telegram_linked: false,
            send_daily_report: true,
            send_weekly_report: true,
        }
    }

    /// Attaches a chat identifier and marks the account linked.
    pub fn link_telegram(&mut self, chat_id: i64) {
        self.telegram_id = Some(chat_id);
        self.telegram_linked = true;
    }

    pub fn unlink_telegram(&mut self) {
        self.telegram_id = None;
        self.telegram_linked = false;
    }

    fn default_send_daily_report() -> bool {
        true
    }

    fn default_send_weekly_report() -> bool {
        true
    }
}

impl Identifiable for User {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for User {
    fn name(&self) -> &str {
        &self.username
    }
}

impl Displayable for User {
    fn display_label(&self) -> String {
        match self.telegram_id {
            Some(chat_id) => format!("{} (chat {})", self.username, chat_id),
            None => self.username.clone(),
        }
    }
}
