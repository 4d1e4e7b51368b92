//! Case-folding lookup over one user's categories.

use std::collections::HashMap;

use uuid::Uuid;

use fintrack_domain::Category;

/// Index over a user's category list, built once per request.
///
/// Name lookups fold case up front so report construction never does
/// per-row case-insensitive scans.
pub struct CategoryIndex {
    categories: Vec<Category>,
    by_id: HashMap<Uuid, usize>,
    by_folded_name: HashMap<String, usize>,
}

impl CategoryIndex {
    pub fn build(categories: Vec<Category>) -> Self {
        let mut by_id = HashMap::with_capacity(categories.len());
        let mut by_folded_name = HashMap::with_capacity(categories.len());
        for (position, category) in categories.iter().enumerate() {
            by_id.insert(category.id, position);
            // First entry wins; duplicates cannot exist for a valid user.
            by_folded_name
                .entry(fold(&category.name))
                .or_insert(position);
        }
        Self {
            categories,
            by_id,
            by_folded_name,
        }
    }

    pub fn by_id(&self, id: Uuid) -> Option<&Category> {
        self.by_id.get(&id).map(|&position| &self.categories[position])
    }

    /// Case-insensitive name lookup.
    pub fn by_name(&self, name: &str) -> Option<&Category> {
        self.by_folded_name
            .get(&fold(name))
            .map(|&position| &self.categories[position])
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_folded_name.contains_key(&fold(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|category| category.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// The closest existing name by edit distance, for "did you mean"
    /// replies. Distances above a third of the input length read as noise
    /// and return nothing.
    pub fn suggest(&self, name: &str) -> Option<&str> {
        let folded = fold(name);
        let (best, distance) = self
            .categories
            .iter()
            .map(|category| {
                (
                    category.name.as_str(),
                    strsim::levenshtein(&fold(&category.name), &folded),
                )
            })
            .min_by_key(|&(_, distance)| distance)?;
        let budget = (folded.chars().count() / 3).max(1);
        (distance <= budget).then_some(best)
    }
}

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_domain::CategoryKind;

    fn index_of(names: &[&str]) -> CategoryIndex {
        let user = Uuid::new_v4();
        CategoryIndex::build(
            names
                .iter()
                .map(|name| Category::new(user, *name, CategoryKind::Expense))
                .collect(),
        )
    }

    #[test]
    fn name_lookup_folds_case() {
        let index = index_of(&["Groceries", "Transport"]);
        assert!(index.by_name("groceries").is_some());
        assert!(index.by_name(" GROCERIES ").is_some());
        assert!(index.by_name("rent").is_none());
    }

    #[test]
    fn suggest_finds_near_miss() {
        let index = index_of(&["Groceries", "Transport"]);
        assert_eq!(index.suggest("grocerries"), Some("Groceries"));
        assert_eq!(index.suggest("zzzzzz"), None);
    }

    #[test]
    fn by_id_round_trips() {
        let user = Uuid::new_v4();
        let category = Category::new(user, "Rent", CategoryKind::Expense);
        let id = category.id;
        let index = CategoryIndex::build(vec![category]);
        assert_eq!(index.by_id(id).map(|c| c.name.as_str()), Some("Rent"));
    }
}
