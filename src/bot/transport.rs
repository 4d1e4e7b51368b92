//! The narrow delivery seam between prepared messages and whatever
//! messaging API carries them.

use std::fmt;

/// Delivers one text message to one chat. Implementations own retries,
/// timeouts, and whatever the underlying transport needs.
pub trait MessageSender: Send + Sync {
    fn send(&self, chat_id: i64, text: &str) -> Result<(), SendError>;
}

/// A failed delivery attempt. Carries only a display string; transports
/// keep their own error detail in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendError(pub String);

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for SendError {}

/// Prints messages to stdout. Stands in for a real chat transport in the
/// shell and in dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSender;

impl MessageSender for StdoutSender {
    fn send(&self, chat_id: i64, text: &str) -> Result<(), SendError> {
        println!("[chat {chat_id}] {text}");
        Ok(())
    }
}
