//! Durable storage for the path log.
//!
//! [`PathStore`] keeps the session's segments in memory and mirrors every
//! mutation into a [`KeyValueStore`] as one JSON array under a single key.
//! Backends: [`MemoryStore`] and [`FileStore`] here, `web::LocalStorage` in
//! the browser build.

mod file;
mod paths;
mod store;

pub use file::{DEFAULT_MAX_BYTES, FileStore};
pub use paths::{DEFAULT_STORAGE_KEY, PathStore, StorageOptions};
pub use store::{KeyValueStore, MemoryStore, StoreError};
