//! # File-backed Filter Repository
//!
//! Keeps filters in memory and rewrites a JSON file after every mutation.
//!
//! Writes use the temp-file pattern:
//! 1. Write the full filter set to `<file>.tmp`
//! 2. fsync the temp file
//! 3. Rename over the data file
//!
//! A mutation that fails to persist is rolled back in memory, so memory and
//! disk never diverge.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use uuid::Uuid;

use super::errors::{RepositoryError, RepositoryResult};
use super::model::{sort_for_listing, Filter, FilterListItem, StoredQuery};
use super::repository::{apply_create, apply_delete, apply_update, list_items, FilterRepository};

/// Repository persisted to a single JSON file
#[derive(Debug)]
pub struct FileFilterRepository {
    path: PathBuf,
    temp_path: PathBuf,
    filters: RwLock<HashMap<Uuid, Filter>>,
}

impl FileFilterRepository {
    /// Open the store at `path`, loading existing filters if the file exists
    pub fn open(path: impl Into<PathBuf>) -> RepositoryResult<Self> {
        let path = path.into();
        let temp_path = temp_path_for(&path);
        let filters = load(&path)?;

        tracing::info!(
            path = %path.display(),
            filters = filters.len(),
            "filter store opened"
        );

        Ok(Self {
            path,
            temp_path,
            filters: RwLock::new(filters),
        })
    }

    /// Data file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `mutate` against the map and persist; undo it if persisting fails
    fn mutate<T>(
        &self,
        mutate: impl FnOnce(&mut HashMap<Uuid, Filter>) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        let mut filters = self
            .filters
            .write()
            .map_err(|_| RepositoryError::Storage("Lock poisoned".to_string()))?;

        let before = filters.clone();
        let out = mutate(&mut *filters)?;

        if let Err(e) = self.persist(&filters) {
            *filters = before;
            tracing::error!(path = %self.path.display(), error = %e, "filter store write failed");
            return Err(e);
        }
        Ok(out)
    }

    fn persist(&self, filters: &HashMap<Uuid, Filter>) -> RepositoryResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    storage_error(format!("failed to create data directory: {}", e))
                })?;
            }
        }

        let mut ordered: Vec<&Filter> = filters.values().collect();
        sort_for_listing(&mut ordered);
        let content = serde_json::to_string_pretty(&ordered)
            .map_err(|e| storage_error(format!("failed to serialize filters: {}", e)))?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp_path)
            .map_err(|e| storage_error(format!("failed to create temp file: {}", e)))?;

        file.write_all(content.as_bytes())
            .map_err(|e| storage_error(format!("failed to write filters: {}", e)))?;

        file.sync_all()
            .map_err(|e| storage_error(format!("failed to fsync filters: {}", e)))?;

        fs::rename(&self.temp_path, &self.path)
            .map_err(|e| storage_error(format!("failed to commit filters: {}", e)))?;

        // Best effort: make the rename itself durable
        if let Some(parent) = self.path.parent() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        Ok(())
    }
}

fn storage_error(message: String) -> RepositoryError {
    RepositoryError::Storage(message)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn load(path: &Path) -> RepositoryResult<HashMap<Uuid, Filter>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| storage_error(format!("failed to read {}: {}", path.display(), e)))?;

    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }

    let filters: Vec<Filter> = serde_json::from_str(&content)
        .map_err(|e| storage_error(format!("failed to parse {}: {}", path.display(), e)))?;

    Ok(filters.into_iter().map(|f| (f.id, f)).collect())
}

impl FilterRepository for FileFilterRepository {
    fn create(&self, name: &str, query: StoredQuery) -> RepositoryResult<Filter> {
        self.mutate(|filters| apply_create(filters, name, query))
    }

    fn list(&self) -> RepositoryResult<Vec<FilterListItem>> {
        let filters = self
            .filters
            .read()
            .map_err(|_| RepositoryError::Storage("Lock poisoned".to_string()))?;
        Ok(list_items(&filters))
    }

    fn get(&self, id: Uuid) -> RepositoryResult<Filter> {
        let filters = self
            .filters
            .read()
            .map_err(|_| RepositoryError::Storage("Lock poisoned".to_string()))?;
        filters.get(&id).cloned().ok_or(RepositoryError::NotFound)
    }

    fn update(&self, id: Uuid, query: StoredQuery) -> RepositoryResult<Filter> {
        self.mutate(|filters| apply_update(filters, id, query))
    }

    fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        self.mutate(|filters| apply_delete(filters, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn query(value: serde_json::Value) -> StoredQuery {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_file_opens_empty() {
        let tmp = TempDir::new().unwrap();
        let repo = FileFilterRepository::open(tmp.path().join("filters.json")).unwrap();
        assert!(repo.list().unwrap().is_empty());
        assert!(!repo.path().exists());
    }

    #[test]
    fn test_filters_survive_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data").join("filters.json");

        let (kept, template) = {
            let repo = FileFilterRepository::open(&path).unwrap();
            let kept = repo.create("kept", query(json!({"status": "error"}))).unwrap();
            let dropped = repo.create("dropped", query(json!({"a": 1}))).unwrap();
            let template = repo
                .create(
                    "template",
                    StoredQuery::Template(r#"{"user_id": {{ current_user }}}"#.into()),
                )
                .unwrap();
            repo.update(kept.id, query(json!({"status": "fatal"}))).unwrap();
            repo.delete(dropped.id).unwrap();
            (repo.get(kept.id).unwrap(), template)
        };

        let reopened = FileFilterRepository::open(&path).unwrap();
        assert_eq!(reopened.list().unwrap().len(), 2);
        assert_eq!(reopened.get(kept.id).unwrap(), kept);
        assert_eq!(reopened.get(template.id).unwrap(), template);
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("filters.json");
        fs::write(&path, "not json").unwrap();

        let err = FileFilterRepository::open(&path).unwrap_err();
        assert!(matches!(err, RepositoryError::Storage(_)));
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("filters.json");
        let repo = FileFilterRepository::open(&path).unwrap();
        repo.create("first", query(json!({"a": 1}))).unwrap();

        // A directory squatting on the temp path makes the next write fail
        fs::create_dir(temp_path_for(&path)).unwrap();

        let err = repo.create("second", query(json!({"b": 2}))).unwrap_err();
        assert!(matches!(err, RepositoryError::Storage(_)));
        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[test]
    fn test_temp_path_sits_next_to_data_file() {
        assert_eq!(
            temp_path_for(Path::new("/var/lib/sf/filters.json")),
            PathBuf::from("/var/lib/sf/filters.json.tmp")
        );
    }
}
