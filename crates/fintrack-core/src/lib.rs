//! fintrack-core
//!
//! Business logic for the finance tracker: the budget analysis engine, the
//! daily digest, and validated write operations. Depends on fintrack-domain.
//! No chat transport, no terminal I/O, no direct storage backend.

pub mod budget_service;
pub mod category_index;
pub mod category_service;
pub mod clock;
pub mod digest_service;
pub mod error;
pub mod format;
pub mod report_service;
pub mod store;
pub mod transaction_service;

pub use budget_service::*;
pub use category_index::*;
pub use category_service::*;
pub use clock::*;
pub use digest_service::*;
pub use error::{CoreError, Result};
pub use format::*;
pub use report_service::*;
pub use store::*;
pub use transaction_service::*;
