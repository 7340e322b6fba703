// In-memory store: same contract as the file store, no disk.
// Used as the substitutable store in tests.

use std::sync::Mutex;

use crate::books::Book;

use super::{BookStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    books: Mutex<Vec<Book>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: Mutex::new(books),
        }
    }
}

impl BookStore for MemoryStore {
    fn load(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.books.lock().unwrap().clone())
    }

    fn save(&self, books: &[Book]) -> Result<(), StoreError> {
        *self.books.lock().unwrap() = books.to_vec();
        Ok(())
    }
}
