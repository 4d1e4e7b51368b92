//! Business logic helpers for category management.

use uuid::Uuid;

use fintrack_domain::{Category, CategoryKind};

use crate::store::require_user;
use crate::{CategoryIndex, CoreError, FinanceStore, Result};

/// Provides validated operations for [`Category`] entities.
pub struct CategoryService;

impl CategoryService {
    /// Adds a new category after checking the name is unique for the user
    /// under case folding and that any parent belongs to the same user.
    pub fn create(
        store: &dyn FinanceStore,
        user_id: Uuid,
        name: &str,
        kind: CategoryKind,
        parent_id: Option<Uuid>,
    ) -> Result<Category> {
        require_user(store, user_id)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("category name must not be empty".into()));
        }
        let index = CategoryIndex::build(store.categories_for(user_id)?);
        if index.contains_name(name) {
            return Err(CoreError::Validation(format!(
                "Category `{}` already exists",
                name
            )));
        }
        if let Some(parent_id) = parent_id {
            if index.by_id(parent_id).is_none() {
                return Err(CoreError::CategoryNotFound(parent_id.to_string()));
            }
        }
        let mut category = Category::new(user_id, name, kind);
        category.parent_id = parent_id;
        store.add_category(category.clone())?;
        Ok(category)
    }

    /// Snapshot of the user's categories.
    pub fn list(store: &dyn FinanceStore, user_id: Uuid) -> Result<Vec<Category>> {
        require_user(store, user_id)?;
        store.categories_for(user_id)
    }
}
