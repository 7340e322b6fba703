// Runtime application state shared across all requests.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::store::BookStore;

use super::types::Config;

pub struct AppState {
    pub config: Config,
    /// Persistence store for the book collection.
    pub store: Arc<dyn BookStore>,
    /// Serializes mutating read-modify-write cycles against the store, so
    /// two concurrent mutations cannot both load before either saves.
    pub write_lock: Mutex<()>,
    /// Cached access-log flag, checked per request without a config lookup.
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn BookStore>) -> Self {
        let access_log = config.logging.access_log;
        Self {
            config,
            store,
            write_lock: Mutex::new(()),
            cached_access_log: AtomicBool::new(access_log),
        }
    }
}
