//! Chat-facing layer: command parsing, routing, account linking, and the
//! daily digest job. The actual message transport stays behind
//! [`transport::MessageSender`].

pub mod command;
pub mod digest;
pub mod link;
pub mod router;
pub mod transport;

pub use command::BotCommand;
pub use digest::DigestJob;
pub use link::{LinkService, RedeemOutcome};
pub use router::CommandRouter;
pub use transport::{MessageSender, SendError, StdoutSender};
