//! fintrack-domain
//!
//! Pure domain models (User, Category, Transaction, MonthlyBudget, reports).
//! No I/O, no chat transport, no storage. Only data types and core enums.

pub mod budget;
pub mod category;
pub mod common;
pub mod link;
pub mod report;
pub mod transaction;
pub mod user;
pub mod window;

pub use budget::*;
pub use category::*;
pub use common::*;
pub use link::*;
pub use report::*;
pub use transaction::*;
pub use user::*;
pub use window::*;
