use super::store::{KeyValueStore, StoreError};
use crate::draw::{PathLog, Point, Segment};
use log::{debug, info, warn};

/// Default storage key for the serialised path log.
pub const DEFAULT_STORAGE_KEY: &str = "canvasPaths";

/// Where and how much [`PathStore`] persists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageOptions {
    /// Key the JSON log is stored under.
    pub key: String,
    /// Maximum number of segments kept; 0 means unlimited.
    pub max_segments: usize,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            max_segments: 0,
        }
    }
}

/// Durable, ordered log of stroke segments.
///
/// The in-memory log is the truth for the running session. Every mutation
/// rewrites the whole log to the backend synchronously. Backend failures are
/// absorbed: the store logs a warning, keeps drawing in memory and reports
/// `is_durable() == false` until a later write succeeds.
///
/// Writing on every pointer sample is fine at this scale; batching per stroke
/// would be the next step if logs grow large.
pub struct PathStore<K: KeyValueStore> {
    backend: K,
    options: StorageOptions,
    log: PathLog,
    durable: bool,
}

impl<K: KeyValueStore> PathStore<K> {
    /// Wraps `backend` with an empty in-memory log. Nothing is read.
    pub fn new(backend: K, options: StorageOptions) -> Self {
        Self {
            backend,
            options,
            log: PathLog::new(),
            durable: true,
        }
    }

    /// Wraps `backend` and restores whatever log it holds.
    pub fn open(backend: K, options: StorageOptions) -> Self {
        let mut store = Self::new(backend, options);
        let segments = store.load();
        if !segments.is_empty() {
            info!(
                "Restored {} segments from '{}'",
                segments.len(),
                store.options.key
            );
        }
        store.log = PathLog::from_segments(segments);
        store
    }

    /// Reads the durable log.
    ///
    /// Absent, unreadable or malformed data yields an empty sequence.
    pub fn load(&self) -> Vec<Segment> {
        let raw = match self.backend.get(&self.options.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored paths under '{}'", self.options.key);
                return Vec::new();
            }
            Err(err) => {
                warn!("Could not read stored paths: {err}");
                return Vec::new();
            }
        };

        let mut segments: Vec<Segment> = match serde_json::from_str::<PathLog>(&raw) {
            Ok(log) => log.segments().to_vec(),
            Err(err) => {
                warn!(
                    "Stored paths under '{}' are malformed ({err}); starting empty",
                    self.options.key
                );
                return Vec::new();
            }
        };

        let max = self.options.max_segments;
        if max > 0 && segments.len() > max {
            warn!(
                "Stored log holds {} segments which exceeds the limit of {}; truncating",
                segments.len(),
                max
            );
            segments.truncate(max);
        }
        segments
    }

    /// The in-memory log, in paint order.
    pub fn segments(&self) -> &[Segment] {
        self.log.segments()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Whether the last write reached the backend.
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    pub fn options(&self) -> &StorageOptions {
        &self.options
    }

    pub fn backend(&self) -> &K {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut K {
        &mut self.backend
    }

    /// Appends a segment and persists the log.
    ///
    /// Segments with non-finite coordinates and segments beyond the
    /// configured cap are refused; returns whether it was appended.
    pub fn append(&mut self, segment: Segment) -> bool {
        if !segment.is_finite() {
            warn!("Refusing segment with non-finite coordinates");
            return false;
        }
        if !self.log.try_push(segment, self.options.max_segments) {
            warn!(
                "Path log is full ({} segments); dropping new segment",
                self.options.max_segments
            );
            return false;
        }
        self.persist();
        true
    }

    /// Swaps in a whole new log and persists it.
    pub fn replace_all(&mut self, segments: Vec<Segment>) {
        let mut segments: Vec<Segment> = segments.into_iter().filter(Segment::is_finite).collect();
        let max = self.options.max_segments;
        if max > 0 && segments.len() > max {
            warn!(
                "Replacement log holds {} segments which exceeds the limit of {}; truncating",
                segments.len(),
                max
            );
            segments.truncate(max);
        }
        self.log.replace(segments);
        self.persist();
    }

    /// Empties the log and removes the stored key.
    pub fn clear(&mut self) {
        self.log.clear();
        match self.backend.remove(&self.options.key) {
            Ok(()) => self.mark_durable(),
            Err(err) => self.mark_degraded(&err),
        }
    }

    /// Drops pen segments with an endpoint within `radius` of `point`.
    ///
    /// Only endpoints are tested, not the distance to the whole segment, so a
    /// long segment passing under the eraser survives. Eraser segments are
    /// never removed. Persists only when something was removed.
    pub fn erase_near(&mut self, point: Point, radius: f64) -> usize {
        if !point.is_finite() || !radius.is_finite() || radius < 0.0 {
            return 0;
        }
        let removed = self.log.erase_near(point, radius);
        if removed > 0 {
            debug!(
                "Erased {removed} segments near ({:.1}, {:.1})",
                point.x, point.y
            );
            self.persist();
        }
        removed
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.log)
            .map_err(StoreError::from)
            .and_then(|json| self.backend.set(&self.options.key, &json));
        match result {
            Ok(()) => self.mark_durable(),
            Err(err) => self.mark_degraded(&err),
        }
    }

    fn mark_durable(&mut self) {
        if !self.durable {
            info!("Path storage writable again");
        }
        self.durable = true;
    }

    fn mark_degraded(&mut self, err: &StoreError) {
        if self.durable {
            warn!("Failed to persist paths, continuing in memory only: {err}");
        } else {
            debug!("Path storage still unavailable: {err}");
        }
        self.durable = false;
    }
}
