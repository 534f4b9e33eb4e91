use super::store::{KeyValueStore, StoreError};
use anyhow::{Context, Result};
use fs2::FileExt;
use log::{debug, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Default byte limit per key, matching the usual browser local-storage quota.
pub const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Directory-backed store: one `<key>.json` file per key.
///
/// Writes go to a temporary file that is renamed into place while holding an
/// exclusive lock on `<key>.lock`; reads take a shared lock on the same file.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_dir: PathBuf,
    max_bytes: usize,
}

impl FileStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    /// Per-key size limit; 0 disables the check.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// `<data dir>/inkpad`, if the platform has a data directory.
    pub fn default_location() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("inkpad"))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn value_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", encode_key(key)))
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.lock", encode_key(key)))
    }

    fn open_lock(&self, key: &str) -> Result<(File, PathBuf)> {
        fs::create_dir_all(&self.base_dir).with_context(|| {
            format!(
                "failed to create storage directory {}",
                self.base_dir.display()
            )
        })?;
        let lock_path = self.lock_path(key);
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("failed to open lock file {}", lock_path.display()))?;
        Ok((lock_file, lock_path))
    }

    fn read_value(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let (lock_file, lock_path) = self.open_lock(key)?;
        lock_file
            .lock_shared()
            .with_context(|| format!("failed to acquire shared lock {}", lock_path.display()))?;

        let result = read_to_string(&path);
        release(&lock_file, &lock_path);
        result
    }

    fn write_value(&self, key: &str, value: &str) -> Result<()> {
        let (lock_file, lock_path) = self.open_lock(key)?;
        lock_file
            .lock_exclusive()
            .with_context(|| format!("failed to lock {}", lock_path.display()))?;

        let result = write_atomically(&self.value_path(key), value.as_bytes());
        release(&lock_file, &lock_path);
        result
    }

    fn remove_value(&self, key: &str) -> Result<()> {
        let path = self.value_path(key);
        if !path.exists() {
            return Ok(());
        }
        let (lock_file, lock_path) = self.open_lock(key)?;
        lock_file
            .lock_exclusive()
            .with_context(|| format!("failed to lock {}", lock_path.display()))?;

        let result = fs::remove_file(&path)
            .with_context(|| format!("failed to remove {}", path.display()));
        release(&lock_file, &lock_path);
        result
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.read_value(key).map_err(unavailable)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.max_bytes > 0 && value.len() > self.max_bytes {
            return Err(StoreError::QuotaExceeded {
                bytes: value.len(),
                limit: Some(self.max_bytes),
            });
        }
        self.write_value(key, value).map_err(unavailable)?;
        debug!(
            "Stored {} bytes at {}",
            value.len(),
            self.value_path(key).display()
        );
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.remove_value(key).map_err(unavailable)
    }
}

fn unavailable(err: anyhow::Error) -> StoreError {
    StoreError::Unavailable(format!("{err:#}"))
}

fn release(lock_file: &File, lock_path: &Path) {
    lock_file.unlock().unwrap_or_else(|err| {
        warn!("failed to unlock {}: {}", lock_path.display(), err)
    });
}

fn read_to_string(path: &Path) -> Result<Option<String>> {
    let mut contents = String::new();
    File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .read_to_string(&mut contents)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(Some(contents))
}

fn write_atomically(target: &Path, bytes: &[u8]) -> Result<()> {
    let tmp_path = temp_path(target);
    {
        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .with_context(|| format!("failed to open temporary file {}", tmp_path.display()))?;
        tmp_file
            .write_all(bytes)
            .context("failed to write stored value")?;
        tmp_file
            .sync_all()
            .context("failed to sync temporary file")?;
    }

    fs::rename(&tmp_path, target).with_context(|| {
        format!(
            "failed to move temporary file {} -> {}",
            tmp_path.display(),
            target.display()
        )
    })
}

fn temp_path(target: &Path) -> PathBuf {
    let mut candidate = target.with_extension("json.tmp");
    let mut counter = 0u32;
    while candidate.exists() {
        counter += 1;
        candidate = target.with_extension(format!("json.tmp{counter}"));
    }
    candidate
}

/// Maps a storage key onto a file stem, one-to-one.
///
/// ASCII letters, digits and `-` are kept; every other byte becomes `%XX`.
/// The empty key maps to a lone `%`, which no other key produces.
fn encode_key(key: &str) -> String {
    if key.is_empty() {
        return "%".to_string();
    }
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("%{byte:02X}"));
        }
    }
    stem
}
