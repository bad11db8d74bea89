//! Attempt log and persistence
//!
//! Append-only record of scored submissions. Persistence goes through the
//! narrow `AttemptStorage` get/put contract; loading tolerates absent or
//! corrupt data by starting empty, and saving keeps only the newest rows.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

use crate::generator::Mode;

/// Retention cap applied to the persisted form on every save
pub const MAX_PERSISTED_ATTEMPTS: usize = 1000;

/// One scored submission. Never mutated after creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Attempt {
    pub id: Uuid,
    /// Question text at time of submission
    pub q: String,
    pub mode: Mode,
    pub correct: bool,
    /// Elapsed milliseconds from question start to submission
    pub ms: u64,
    /// Epoch milliseconds of the submission
    pub timestamp: u64,
}

/// Narrow persistence contract for the attempt log
pub trait AttemptStorage {
    /// Fetch the raw persisted payload, if any
    fn get(&self) -> Option<String>;
    /// Replace the persisted payload
    fn put(&mut self, payload: &str) -> Result<(), Box<dyn Error>>;
}

/// File-backed storage (single JSON document)
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }
}

impl AttemptStorage for JsonFileStorage {
    fn get(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }

    fn put(&mut self, payload: &str) -> Result<(), Box<dyn Error>> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

/// In-memory storage for ephemeral sessions and tests
#[derive(Default)]
pub struct MemoryStorage {
    payload: Option<String>,
}

#[allow(dead_code)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed with a raw payload (possibly malformed, for recovery tests)
    pub fn with_payload(payload: &str) -> Self {
        MemoryStorage {
            payload: Some(payload.to_string()),
        }
    }
}

impl AttemptStorage for MemoryStorage {
    fn get(&self) -> Option<String> {
        self.payload.clone()
    }

    fn put(&mut self, payload: &str) -> Result<(), Box<dyn Error>> {
        self.payload = Some(payload.to_string());
        Ok(())
    }
}

/// Ordered attempt history, insertion order = submission order
pub struct AttemptLog {
    rows: Vec<Attempt>,
    storage: Box<dyn AttemptStorage>,
}

#[allow(dead_code)]
impl AttemptLog {
    /// Load history from storage. Absent or malformed data yields an empty
    /// log, never an error.
    pub fn load(storage: Box<dyn AttemptStorage>) -> Self {
        let rows = storage
            .get()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        AttemptLog { rows, storage }
    }

    /// Append one attempt and persist. The persisted form is truncated to
    /// the newest `MAX_PERSISTED_ATTEMPTS` rows; the in-memory log is not.
    pub fn append(&mut self, attempt: Attempt) -> Result<(), Box<dyn Error>> {
        self.rows.push(attempt);
        self.save()
    }

    fn save(&mut self) -> Result<(), Box<dyn Error>> {
        let start = self.rows.len().saturating_sub(MAX_PERSISTED_ATTEMPTS);
        let payload = serde_json::to_string(&self.rows[start..])?;
        self.storage.put(&payload)
    }

    pub fn rows(&self) -> &[Attempt] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(n: u64, correct: bool) -> Attempt {
        Attempt {
            id: Uuid::new_v4(),
            q: format!("{} + {}", n, n),
            mode: Mode::Arithmetic,
            correct,
            ms: 100 + n,
            timestamp: 1_700_000_000_000 + n,
        }
    }

    #[test]
    fn test_load_empty_when_absent() {
        let log = AttemptLog::load(Box::new(MemoryStorage::new()));
        assert!(log.is_empty());
    }

    #[test]
    fn test_load_empty_when_malformed() {
        let log = AttemptLog::load(Box::new(MemoryStorage::with_payload("{not json")));
        assert!(log.is_empty());
        let log = AttemptLog::load(Box::new(MemoryStorage::with_payload("{\"a\":1}")));
        assert!(log.is_empty());
    }

    #[test]
    fn test_append_round_trips_through_storage() {
        let mut log = AttemptLog::load(Box::new(MemoryStorage::new()));
        log.append(attempt(1, true)).unwrap();
        log.append(attempt(2, false)).unwrap();

        let stored: Vec<Attempt> =
            serde_json::from_str(&log.storage.get().unwrap()).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].q, "1 + 1");
        assert_eq!(stored[1].q, "2 + 2");
        assert!(stored[0].correct);
        assert!(!stored[1].correct);
    }

    #[test]
    fn test_mode_tag_serialization() {
        let raw = serde_json::to_string(&attempt(3, true)).unwrap();
        assert!(raw.contains("\"mode\":\"arithmetic\""));
    }

    #[test]
    fn test_retention_keeps_newest_thousand() {
        let mut log = AttemptLog::load(Box::new(MemoryStorage::new()));
        for n in 0..1005 {
            log.append(attempt(n, true)).unwrap();
        }

        let stored: Vec<Attempt> =
            serde_json::from_str(&log.storage.get().unwrap()).unwrap();
        assert_eq!(stored.len(), MAX_PERSISTED_ATTEMPTS);
        // Oldest five dropped, order preserved
        assert_eq!(stored[0].q, "5 + 5");
        assert_eq!(stored[999].q, "1004 + 1004");
        for pair in stored.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }
}
