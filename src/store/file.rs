// File-backed store: one pretty-printed JSON array on disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::books::Book;

use super::{BookStore, StoreError};

/// Stores the collection in a JSON document at a fixed path.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create the storage document holding an empty collection if it does
    /// not exist yet. Called once at startup; `load` itself stays strict
    /// about missing files.
    pub fn ensure_initialized(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        self.write_atomic(b"[]")
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write to a temp file next to the target, then rename it over the
    /// target. A failed write never clobbers the previous contents.
    fn write_atomic(&self, content: &[u8]) -> Result<(), StoreError> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl BookStore for FileStore {
    fn load(&self) -> Result<Vec<Book>, StoreError> {
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(StoreError::Parse)
    }

    fn save(&self, books: &[Book]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(books).map_err(StoreError::Parse)?;
        self.write_atomic(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};
    use tempfile::TempDir;

    fn book(id: u64, title: &str) -> Book {
        let mut fields = Map::new();
        fields.insert("title".to_string(), Value::String(title.to_string()));
        Book::new(id, fields)
    }

    fn store_in(dir: &TempDir) -> FileStore {
        FileStore::new(dir.path().join("books.json"))
    }

    #[test]
    fn test_ensure_initialized_creates_empty_collection() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.ensure_initialized().unwrap();
        assert_eq!(store.load().unwrap(), vec![]);
    }

    #[test]
    fn test_ensure_initialized_keeps_existing_contents() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&[book(1, "Dune")]).unwrap();

        store.ensure_initialized().unwrap();
        assert_eq!(store.load().unwrap(), vec![book(1, "Dune")]);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "not json").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }

    #[test]
    fn test_load_rejects_non_array_document() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{\"id\": 1}").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut fields = Map::new();
        fields.insert("title".to_string(), json!("Dune"));
        fields.insert("year".to_string(), json!(1965));
        let books = vec![Book::new(1, fields), book(2, "Solaris")];

        store.save(&books).unwrap();
        assert_eq!(store.load().unwrap(), books);
    }

    #[test]
    fn test_save_replaces_previous_contents() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save(&[book(1, "Dune"), book(2, "Solaris")]).unwrap();
        store.save(&[book(2, "Solaris")]).unwrap();

        assert_eq!(store.load().unwrap(), vec![book(2, "Solaris")]);
    }

    #[test]
    fn test_save_leaves_no_temp_file_behind() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save(&[book(1, "Dune")]).unwrap();
        assert!(!dir.path().join("books.json.tmp").exists());
    }
}
