//! # Filter Repository
//!
//! Persistence seam for filters, keyed by id.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use super::errors::{RepositoryError, RepositoryResult};
use super::model::{sort_for_listing, Filter, FilterListItem, StoredQuery};

/// Storage for filters
pub trait FilterRepository: Send + Sync {
    /// Store a new filter
    fn create(&self, name: &str, query: StoredQuery) -> RepositoryResult<Filter>;

    /// All filters, oldest first
    fn list(&self) -> RepositoryResult<Vec<FilterListItem>>;

    /// Get a filter by id
    fn get(&self, id: Uuid) -> RepositoryResult<Filter>;

    /// Replace a filter's query
    fn update(&self, id: Uuid, query: StoredQuery) -> RepositoryResult<Filter>;

    /// Remove a filter
    fn delete(&self, id: Uuid) -> RepositoryResult<()>;
}

/// In-memory repository
#[derive(Debug, Default)]
pub struct InMemoryFilterRepository {
    filters: RwLock<HashMap<Uuid, Filter>>,
}

impl InMemoryFilterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn with_filters(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self {
            filters: RwLock::new(filters.into_iter().map(|f| (f.id, f)).collect()),
        }
    }

    fn read(&self) -> RepositoryResult<std::sync::RwLockReadGuard<'_, HashMap<Uuid, Filter>>> {
        self.filters
            .read()
            .map_err(|_| RepositoryError::Storage("Lock poisoned".to_string()))
    }

    fn write(&self) -> RepositoryResult<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, Filter>>> {
        self.filters
            .write()
            .map_err(|_| RepositoryError::Storage("Lock poisoned".to_string()))
    }
}

fn listing(filters: &HashMap<Uuid, Filter>) -> Vec<&Filter> {
    let mut ordered: Vec<&Filter> = filters.values().collect();
    sort_for_listing(&mut ordered);
    ordered
}

/// Apply a mutation to a filter map. Shared with the file-backed store.
pub(crate) fn apply_create(
    filters: &mut HashMap<Uuid, Filter>,
    name: &str,
    query: StoredQuery,
) -> RepositoryResult<Filter> {
    let filter = Filter::new(name, query);
    if filters.contains_key(&filter.id) {
        return Err(RepositoryError::Conflict(format!(
            "duplicate filter id {}",
            filter.id
        )));
    }
    filters.insert(filter.id, filter.clone());
    Ok(filter)
}

pub(crate) fn apply_update(
    filters: &mut HashMap<Uuid, Filter>,
    id: Uuid,
    query: StoredQuery,
) -> RepositoryResult<Filter> {
    let filter = filters.get_mut(&id).ok_or(RepositoryError::NotFound)?;
    filter.replace_query(query);
    Ok(filter.clone())
}

pub(crate) fn apply_delete(filters: &mut HashMap<Uuid, Filter>, id: Uuid) -> RepositoryResult<()> {
    filters
        .remove(&id)
        .map(|_| ())
        .ok_or(RepositoryError::NotFound)
}

pub(crate) fn list_items(filters: &HashMap<Uuid, Filter>) -> Vec<FilterListItem> {
    listing(filters)
        .into_iter()
        .map(Filter::to_list_item)
        .collect()
}

impl FilterRepository for InMemoryFilterRepository {
    fn create(&self, name: &str, query: StoredQuery) -> RepositoryResult<Filter> {
        let mut filters = self.write()?;
        apply_create(&mut filters, name, query)
    }

    fn list(&self) -> RepositoryResult<Vec<FilterListItem>> {
        let filters = self.read()?;
        Ok(list_items(&filters))
    }

    fn get(&self, id: Uuid) -> RepositoryResult<Filter> {
        let filters = self.read()?;
        filters.get(&id).cloned().ok_or(RepositoryError::NotFound)
    }

    fn update(&self, id: Uuid, query: StoredQuery) -> RepositoryResult<Filter> {
        let mut filters = self.write()?;
        apply_update(&mut filters, id, query)
    }

    fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let mut filters = self.write()?;
        apply_delete(&mut filters, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(value: serde_json::Value) -> StoredQuery {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let repo = InMemoryFilterRepository::new();
        let created = repo.create("errors", query(json!({"status": "error"}))).unwrap();

        let fetched = repo.get(created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[test]
    fn test_list_in_creation_order() {
        let mut older = Filter::new("older", query(json!({"a": 1})));
        let newer = Filter::new("newer", query(json!({"b": 2})));
        older.created_at = newer.created_at - chrono::Duration::seconds(5);

        let repo = InMemoryFilterRepository::with_filters(vec![newer, older]);
        let names: Vec<_> = repo.list().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["older", "newer"]);
    }

    #[test]
    fn test_update_replaces_query() {
        let repo = InMemoryFilterRepository::new();
        let created = repo.create("errors", query(json!({"status": "error"}))).unwrap();

        let updated = repo
            .update(created.id, query(json!({"status": "fatal"})))
            .unwrap();
        assert_eq!(updated.query, query(json!({"status": "fatal"})));
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(repo.get(created.id).unwrap(), updated);
    }

    #[test]
    fn test_unknown_id_not_found() {
        let repo = InMemoryFilterRepository::new();
        let id = Uuid::new_v4();

        assert_eq!(repo.get(id), Err(RepositoryError::NotFound));
        assert_eq!(
            repo.update(id, query(json!({"a": 1}))),
            Err(RepositoryError::NotFound)
        );
        assert_eq!(repo.delete(id), Err(RepositoryError::NotFound));
    }

    #[test]
    fn test_delete() {
        let repo = InMemoryFilterRepository::new();
        let created = repo.create("errors", query(json!({"status": "error"}))).unwrap();

        repo.delete(created.id).unwrap();
        assert!(repo.list().unwrap().is_empty());
        assert_eq!(repo.get(created.id), Err(RepositoryError::NotFound));
    }

    #[test]
    fn test_with_filters_seeds_store() {
        let filter = Filter::new("seeded", query(json!({"a": 1})));
        let repo = InMemoryFilterRepository::with_filters(vec![filter.clone()]);
        assert_eq!(repo.get(filter.id).unwrap(), filter);
        let items = repo.list().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, filter.id);
    }
}
