//! Single-use tokens that tie a chat identity to an account.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A short-lived token handed out by the web side and redeemed from chat.
/// At most one token exists per user; issuing a new one replaces it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkToken {
    pub user_id: Uuid,
    pub token: String,
    pub issued_at: DateTime<Utc>,
}

impl LinkToken {
    pub fn issue(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            token: Uuid::new_v4().to_string(),
            issued_at: now,
        }
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.issued_at
    }
}
