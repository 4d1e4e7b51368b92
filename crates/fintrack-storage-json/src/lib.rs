//! Reference [`FinanceStore`] backend: an in-memory dataset with atomic
//! JSON snapshot persistence. Stands in for the relational database the
//! production deployment would use.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use uuid::Uuid;

use fintrack_core::{CoreError, FinanceStore, Result};
use fintrack_domain::{
    BudgetMonth, Category, CategoryKind, DateWindow, LinkToken, MonthlyBudget, Transaction, User,
};

const TMP_SUFFIX: &str = "tmp";

/// Everything the tracker persists, as one serializable snapshot.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budgets: Vec<MonthlyBudget>,
    #[serde(default)]
    pub link_tokens: Vec<LinkToken>,
}

/// JSON-backed store. Every mutation applies atomically under the lock and,
/// when a snapshot path is configured, rewrites the snapshot through a
/// tmp-rename so a crash never leaves a torn file.
pub struct JsonStore {
    path: Option<PathBuf>,
    inner: RwLock<Dataset>,
}

impl JsonStore {
    /// A store with no snapshot file; used by tests and dry runs.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            inner: RwLock::new(Dataset::default()),
        }
    }

    pub fn with_dataset(dataset: Dataset) -> Self {
        Self {
            path: None,
            inner: RwLock::new(dataset),
        }
    }

    /// Opens a snapshot file, creating an empty dataset when none exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let dataset = if path.exists() {
            load_dataset(&path)?
        } else {
            Dataset::default()
        };
        Ok(Self {
            path: Some(path),
            inner: RwLock::new(dataset),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Writes the current dataset to the snapshot path, if one is set.
    pub fn save(&self) -> Result<()> {
        let data = self.read()?;
        self.persist(&data)
    }

    /// A point-in-time copy of the whole dataset.
    pub fn snapshot(&self) -> Result<Dataset> {
        Ok(self.read()?.clone())
    }

    fn persist(&self, data: &Dataset) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        save_dataset(data, path)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Dataset>> {
        self.inner
            .read()
            .map_err(|_| CoreError::Storage("dataset lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Dataset>> {
        self.inner
            .write()
            .map_err(|_| CoreError::Storage("dataset lock poisoned".into()))
    }
}

impl FinanceStore for JsonStore {
    fn user(&self, user_id: Uuid) -> Result<Option<User>> {
        let data = self.read()?;
        Ok(data.users.iter().find(|user| user.id == user_id).cloned())
    }

    fn user_by_telegram(&self, chat_id: i64) -> Result<Option<User>> {
        let data = self.read()?;
        Ok(data
            .users
            .iter()
            .find(|user| user.telegram_id == Some(chat_id))
            .cloned())
    }

    fn user_by_name(&self, username: &str) -> Result<Option<User>> {
        let data = self.read()?;
        Ok(data
            .users
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    fn add_user(&self, user: User) -> Result<()> {
        let mut data = self.write()?;
        if data.users.iter().any(|existing| {
            existing.id == user.id || existing.username == user.username
        }) {
            return Err(CoreError::Validation(format!(
                "user `{}` already exists",
                user.username
            )));
        }
        data.users.push(user);
        self.persist(&data)
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let mut data = self.write()?;
        let slot = data
            .users
            .iter_mut()
            .find(|existing| existing.id == user.id)
            .ok_or(CoreError::NotLinked)?;
        *slot = user.clone();
        self.persist(&data)
    }

    fn digest_recipients(&self) -> Result<Vec<User>> {
        let data = self.read()?;
        Ok(data
            .users
            .iter()
            .filter(|user| user.telegram_linked && user.send_daily_report)
            .cloned()
            .collect())
    }

    fn categories_for(&self, user_id: Uuid) -> Result<Vec<Category>> {
        let data = self.read()?;
        Ok(data
            .categories
            .iter()
            .filter(|category| category.user_id == user_id)
            .cloned()
            .collect())
    }

    fn add_category(&self, category: Category) -> Result<()> {
        let mut data = self.write()?;
        if !data.users.iter().any(|user| user.id == category.user_id) {
            return Err(CoreError::NotLinked);
        }
        data.categories.push(category);
        self.persist(&data)
    }

    fn transactions_in(
        &self,
        user_id: Uuid,
        window: DateWindow,
        polarity: Option<CategoryKind>,
    ) -> Result<Vec<Transaction>> {
        let data = self.read()?;
        let matches_polarity = |txn: &Transaction| match polarity {
            None => true,
            Some(kind) => data
                .categories
                .iter()
                .find(|category| category.id == txn.category_id)
                .map(|category| category.kind == kind)
                .unwrap_or(false),
        };
        Ok(data
            .transactions
            .iter()
            .filter(|txn| {
                txn.user_id == user_id && window.contains(txn.date) && matches_polarity(txn)
            })
            .cloned()
            .collect())
    }

    fn add_transaction(&self, transaction: Transaction) -> Result<()> {
        let mut data = self.write()?;
        if !data.users.iter().any(|user| user.id == transaction.user_id) {
            return Err(CoreError::NotLinked);
        }
        let owned_category = data.categories.iter().any(|category| {
            category.id == transaction.category_id && category.user_id == transaction.user_id
        });
        if !owned_category {
            return Err(CoreError::CategoryNotFound(
                transaction.category_id.to_string(),
            ));
        }
        data.transactions.push(transaction);
        self.persist(&data)
    }

    fn budget_for(&self, user_id: Uuid, month: BudgetMonth) -> Result<Option<MonthlyBudget>> {
        let data = self.read()?;
        Ok(data
            .budgets
            .iter()
            .find(|budget| budget.user_id == user_id && budget.month == month)
            .cloned())
    }

    fn upsert_budget(&self, budget: MonthlyBudget) -> Result<()> {
        let mut data = self.write()?;
        if !data.users.iter().any(|user| user.id == budget.user_id) {
            return Err(CoreError::NotLinked);
        }
        match data
            .budgets
            .iter_mut()
            .find(|row| row.user_id == budget.user_id && row.month == budget.month)
        {
            Some(row) => *row = budget,
            None => data.budgets.push(budget),
        }
        self.persist(&data)
    }

    fn put_link_token(&self, token: LinkToken) -> Result<()> {
        let mut data = self.write()?;
        data.link_tokens.retain(|row| row.user_id != token.user_id);
        data.link_tokens.push(token);
        self.persist(&data)
    }

    fn take_link_token(&self, token: &str) -> Result<Option<LinkToken>> {
        let mut data = self.write()?;
        let position = data.link_tokens.iter().position(|row| row.token == token);
        let taken = position.map(|position| data.link_tokens.remove(position));
        if taken.is_some() {
            self.persist(&data)?;
        }
        Ok(taken)
    }
}

/// Loads a dataset snapshot from the provided filesystem path.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
}

/// Saves a dataset snapshot to an arbitrary path on disk.
pub fn save_dataset(dataset: &Dataset, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(dataset)
        .map_err(|err| CoreError::Serde(err.to_string()))?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
