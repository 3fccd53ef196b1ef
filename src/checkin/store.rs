//! Append-only check-in storage

use crate::checkin::record::CheckInRecord;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Storage failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record's id does not continue the user's sequence
    #[error("check-in id {got} conflicts with stored sequence (expected {expected})")]
    IdConflict { expected: u64, got: u64 },
    #[error("failed to access check-in store '{path}'")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("malformed check-in data")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Append-only sequence of check-in records
pub trait CheckInStore {
    /// Records belonging to one user, in append order
    fn records_for(&self, user_id: u32) -> Vec<CheckInRecord>;

    /// Append a record. Fails without mutating anything if the id does
    /// not continue the user's sequence
    fn append(&mut self, record: CheckInRecord) -> StoreResult<()>;

    /// Every stored record, in append order
    fn all(&self) -> &[CheckInRecord];
}

fn check_sequence(records: &[CheckInRecord], record: &CheckInRecord) -> StoreResult<()> {
    let expected = records.iter().filter(|r| r.user_id == record.user_id).count() as u64 + 1;
    if record.id != expected {
        return Err(StoreError::IdConflict {
            expected,
            got: record.id,
        });
    }
    Ok(())
}

/// Volatile in-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<CheckInRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CheckInStore for MemoryStore {
    fn records_for(&self, user_id: u32) -> Vec<CheckInRecord> {
        self.records.iter().filter(|r| r.user_id == user_id).cloned().collect()
    }

    fn append(&mut self, record: CheckInRecord) -> StoreResult<()> {
        check_sequence(&self.records, &record)?;
        self.records.push(record);
        Ok(())
    }

    fn all(&self) -> &[CheckInRecord] {
        &self.records
    }
}

/// Store persisted as a single JSON array, rewritten on every append
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: Vec<CheckInRecord>,
}

impl JsonFileStore {
    /// Open a store file; a missing file is an empty store
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let records = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        info!(path = %path.display(), records = records.len(), "check-in store opened");
        Ok(Self { path, records })
    }

    fn persist(&self) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(&self.records)?;
        fs::write(&self.path, content).map_err(|source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        })
    }
}

impl CheckInStore for JsonFileStore {
    fn records_for(&self, user_id: u32) -> Vec<CheckInRecord> {
        self.records.iter().filter(|r| r.user_id == user_id).cloned().collect()
    }

    fn append(&mut self, record: CheckInRecord) -> StoreResult<()> {
        check_sequence(&self.records, &record)?;
        self.records.push(record);
        if let Err(error) = self.persist() {
            self.records.pop();
            return Err(error);
        }
        debug!(path = %self.path.display(), total = self.records.len(), "check-in appended");
        Ok(())
    }

    fn all(&self) -> &[CheckInRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Coordinate;
    use std::env;
    use std::process;

    fn record(id: u64, user_id: u32) -> CheckInRecord {
        CheckInRecord {
            id,
            user_id,
            time: "2024-03-05 08:07:06".to_string(),
            location: Coordinate::new(24.998527, 121.457033).unwrap(),
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("geocheckin-{}-{}.json", process::id(), name))
    }

    #[test]
    fn test_memory_store_sequences_per_user() {
        let mut store = MemoryStore::new();
        store.append(record(1, 1)).unwrap();
        store.append(record(1, 2)).unwrap();
        store.append(record(2, 1)).unwrap();

        assert_eq!(store.records_for(1).len(), 2);
        assert_eq!(store.records_for(2).len(), 1);
        assert_eq!(store.all().len(), 3);
    }

    #[test]
    fn test_id_conflict_does_not_mutate() {
        let mut store = MemoryStore::new();
        store.append(record(1, 1)).unwrap();

        let err = store.append(record(1, 1)).unwrap_err();
        assert!(matches!(err, StoreError::IdConflict { expected: 2, got: 1 }));
        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn test_json_store_round_trip() {
        let path = temp_path("round-trip");
        let _ = fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path).unwrap();
        assert!(store.all().is_empty());
        store.append(record(1, 1)).unwrap();
        store.append(record(2, 1)).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.all(), store.all());

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[1]["userId"], 1);
        assert_eq!(raw[1]["location"]["lng"], 121.457033);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_json_store_rejects_malformed_file() {
        let path = temp_path("malformed");
        fs::write(&path, "{ not json").unwrap();

        let result = JsonFileStore::open(&path);
        assert!(matches!(result, Err(StoreError::Serialization(_))));

        fs::remove_file(&path).unwrap();
    }
}
