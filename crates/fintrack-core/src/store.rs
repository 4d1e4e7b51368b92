use uuid::Uuid;

use fintrack_domain::{
    BudgetMonth, Category, CategoryKind, DateWindow, LinkToken, MonthlyBudget, Transaction, User,
};

use crate::Result;

/// Abstraction over the relational store the tracker runs against.
///
/// Every read is scoped to a single user; implementations must filter by
/// `user_id` before aggregating, since cross-user reads are never valid. Writes
/// are single-row operations the backend applies atomically; no
/// application-level locking is layered on top.
pub trait FinanceStore: Send + Sync {
    fn user(&self, user_id: Uuid) -> Result<Option<User>>;
    fn user_by_telegram(&self, chat_id: i64) -> Result<Option<User>>;
    fn user_by_name(&self, username: &str) -> Result<Option<User>>;
    fn add_user(&self, user: User) -> Result<()>;
    fn update_user(&self, user: &User) -> Result<()>;
    /// Users who linked a chat and opted into the daily digest.
    fn digest_recipients(&self) -> Result<Vec<User>>;

    fn categories_for(&self, user_id: Uuid) -> Result<Vec<Category>>;
    fn add_category(&self, category: Category) -> Result<()>;

    /// Transactions for one user whose date falls inside `window`, optionally
    /// restricted to one category polarity.
    fn transactions_in(
        &self,
        user_id: Uuid,
        window: DateWindow,
        polarity: Option<CategoryKind>,
    ) -> Result<Vec<Transaction>>;
    fn add_transaction(&self, transaction: Transaction) -> Result<()>;

    fn budget_for(&self, user_id: Uuid, month: BudgetMonth) -> Result<Option<MonthlyBudget>>;
    /// Inserts or replaces the budget row keyed by `(user_id, month)`.
    fn upsert_budget(&self, budget: MonthlyBudget) -> Result<()>;

    /// Stores a link token, replacing any previous token for the same user.
    fn put_link_token(&self, token: LinkToken) -> Result<()>;
    /// Removes and returns the token with the given value, if present.
    fn take_link_token(&self, token: &str) -> Result<Option<LinkToken>>;
}

/// Resolves a user id or fails with [`CoreError::NotLinked`]; an unknown
/// identifier must never turn into a zero-valued report.
pub fn require_user(store: &dyn FinanceStore, user_id: Uuid) -> Result<User> {
    store.user(user_id)?.ok_or(crate::CoreError::NotLinked)
}
