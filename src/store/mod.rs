//! Persistence store module
//!
//! The book collection lives in a single JSON document: loaded whole on
//! every operation, written back whole on every mutation. The store does no
//! locking of its own; callers serialize mutating read-modify-write cycles
//! (see `AppState::write_lock`).

mod file;
#[cfg(test)]
mod memory;

pub use file::FileStore;
#[cfg(test)]
pub use memory::MemoryStore;

use crate::books::Book;
use std::fmt;

/// Failure modes of the persistence store.
#[derive(Debug)]
pub enum StoreError {
    /// Storage location unreadable or unwritable.
    Io(std::io::Error),
    /// Storage content is not a valid JSON array of book records.
    Parse(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "storage I/O error: {e}"),
            Self::Parse(e) => write!(f, "invalid storage content: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Durable mapping from a fixed storage location to the book collection.
pub trait BookStore: Send + Sync {
    /// Read and parse the whole collection.
    fn load(&self) -> Result<Vec<Book>, StoreError>;

    /// Serialize and replace the whole collection.
    fn save(&self, books: &[Book]) -> Result<(), StoreError>;
}
