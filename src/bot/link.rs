//! Linking chat identities to accounts through short-lived tokens.

use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use fintrack_core::{Clock, CoreError, FinanceStore, Result};
use fintrack_domain::{LinkToken, User};

/// How long an issued token stays redeemable.
pub const TOKEN_TTL_MINUTES: i64 = 5;

/// Outcome of a redemption attempt. Stale and unknown tokens are normal
/// flows with their own replies, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum RedeemOutcome {
    Linked(User),
    Expired,
    UnknownToken,
}

/// Issues and redeems link tokens against the store.
pub struct LinkService {
    store: Arc<dyn FinanceStore>,
    clock: Arc<dyn Clock>,
}

impl LinkService {
    pub fn new(store: Arc<dyn FinanceStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Creates a fresh token for the user, invalidating any previous one.
    pub fn issue(&self, user_id: Uuid) -> Result<LinkToken> {
        let user = self.store.user(user_id)?.ok_or(CoreError::NotLinked)?;
        let token = LinkToken::issue(user.id, self.clock.now());
        self.store.put_link_token(token.clone())?;
        tracing::info!(user = %user.username, "link token issued");
        Ok(token)
    }

    /// Consumes a token and, when it is still fresh, links the chat to the
    /// owning account. The token is deleted either way.
    pub fn redeem(&self, token: &str, chat_id: i64) -> Result<RedeemOutcome> {
        let Some(stored) = self.store.take_link_token(token)? else {
            return Ok(RedeemOutcome::UnknownToken);
        };
        if stored.age(self.clock.now()) > Duration::minutes(TOKEN_TTL_MINUTES) {
            tracing::info!(chat_id, "stale link token discarded");
            return Ok(RedeemOutcome::Expired);
        }
        let Some(mut user) = self.store.user(stored.user_id)? else {
            return Ok(RedeemOutcome::UnknownToken);
        };
        user.link_telegram(chat_id);
        self.store.update_user(&user)?;
        tracing::info!(user = %user.username, chat_id, "chat linked");
        Ok(RedeemOutcome::Linked(user))
    }
}
