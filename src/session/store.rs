use std::collections::HashMap;
use thiserror::Error;

/// Failures reported by a durable key-value backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The write would exceed the backend's byte quota. `limit` is `None`
    /// when the backend does not disclose it.
    #[error(
        "storage quota exceeded: {bytes} bytes requested{}",
        .limit.map(|limit| format!(", {limit} allowed")).unwrap_or_default()
    )]
    QuotaExceeded { bytes: usize, limit: Option<usize> },

    /// The backend cannot be reached (disabled, missing, locked, I/O failure).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The path log could not be encoded.
    #[error("failed to serialise path log: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Minimal durable string map, modelled on the browser's local storage.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process store with an optional byte quota.
///
/// Quota accounting counts key and value bytes of every entry, like browser
/// local storage does.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
    available: bool,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            quota: None,
            available: true,
            writes: 0,
        }
    }

    /// A store that refuses writes pushing its total size above `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::new()
        }
    }

    /// A store whose every operation fails, as when storage is disabled.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Total key and value bytes currently stored.
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available {
            Ok(())
        } else {
            Err(StoreError::Unavailable("storage disabled".into()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_available()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_available()?;
        if let Some(limit) = self.quota {
            let existing = self.entries.get(key).map_or(0, |v| key.len() + v.len());
            let bytes = self.used_bytes() - existing + key.len() + value.len();
            if bytes > limit {
                return Err(StoreError::QuotaExceeded {
                    bytes,
                    limit: Some(limit),
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.check_available()?;
        self.entries.remove(key);
        Ok(())
    }
}
