//! Ranked score storage for the leaderboard server
//!
//! Rows are kept in insertion order in memory. When opened with a snapshot
//! path, the whole table is written back as a bincode snapshot after every
//! insert, so a restarted server picks up where it left off.
//!
//! A store that could not be opened is still constructed, in the
//! unavailable state, so the server can keep answering requests with a
//! store error instead of refusing to start.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score store is unavailable")]
    Unavailable,
    #[error("failed to access store snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode store snapshot: {0}")]
    Encode(#[from] bincode::Error),
}

/// One stored leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRow {
    /// Monotonic row id; also the tie-breaker between equal scores
    pub id: u64,
    pub name: String,
    pub score: i64,
    pub level: i64,
    /// Row creation time in epoch milliseconds
    pub created_at_ms: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    next_id: u64,
    rows: Vec<ScoreRow>,
}

#[derive(Debug)]
pub struct ScoreStore {
    rows: Vec<ScoreRow>,
    next_id: u64,
    snapshot_path: Option<PathBuf>,
    available: bool,
}

impl ScoreStore {
    /// Creates an empty store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
            snapshot_path: None,
            available: true,
        }
    }

    /// Creates a store that rejects every operation with `StoreError::Unavailable`
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::in_memory()
        }
    }

    /// Opens a snapshot-backed store, loading existing rows if the file exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let snapshot = if path.exists() {
            let bytes = fs::read(&path)?;
            let snapshot: Snapshot = bincode::deserialize(&bytes)?;
            info!(
                "Loaded {} leaderboard rows from {:?}",
                snapshot.rows.len(),
                path
            );
            snapshot
        } else {
            info!("No leaderboard snapshot at {:?}, starting fresh", path);
            Snapshot {
                next_id: 1,
                rows: Vec::new(),
            }
        };

        Ok(Self {
            next_id: snapshot
                .next_id
                .max(snapshot.rows.iter().map(|r| r.id + 1).max().unwrap_or(1)),
            rows: snapshot.rows,
            snapshot_path: Some(path),
            available: true,
        })
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Inserts a row and returns it
    ///
    /// If the snapshot cannot be written the row is rolled back, so the
    /// in-memory table never runs ahead of what is on disk.
    pub fn insert(
        &mut self,
        name: &str,
        score: i64,
        level: i64,
        created_at_ms: u64,
    ) -> Result<ScoreRow, StoreError> {
        self.ensure_available()?;

        let row = ScoreRow {
            id: self.next_id,
            name: name.to_string(),
            score,
            level,
            created_at_ms,
        };
        self.rows.push(row.clone());
        self.next_id += 1;

        if let Err(e) = self.persist() {
            warn!("Rolling back row {} after snapshot failure: {}", row.id, e);
            self.rows.pop();
            self.next_id -= 1;
            return Err(e);
        }

        Ok(row)
    }

    /// Number of rows with a score strictly greater than `score`
    pub fn count_above(&self, score: i64) -> Result<u64, StoreError> {
        self.ensure_available()?;
        Ok(self.rows.iter().filter(|r| r.score > score).count() as u64)
    }

    /// Highest scores first; equal scores keep insertion order
    pub fn top(&self, limit: usize) -> Result<Vec<ScoreRow>, StoreError> {
        self.ensure_available()?;
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
        rows.truncate(limit);
        Ok(rows)
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available {
            Ok(())
        } else {
            Err(StoreError::Unavailable)
        }
    }

    fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let snapshot = Snapshot {
            next_id: self.next_id,
            rows: self.rows.clone(),
        };
        let bytes = bincode::serialize(&snapshot)?;

        // Write-then-rename so a crash never leaves a truncated snapshot.
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, bytes)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_snapshot_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "fragment-catch-store-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir.join("leaderboard.bin")
    }

    #[test]
    fn test_in_memory_store_starts_empty() {
        let store = ScoreStore::in_memory();
        assert!(store.is_empty());
        assert!(store.is_available());
        assert_eq!(store.top(10).unwrap(), vec![]);
    }

    #[test]
    fn test_insert_assigns_ids() {
        let mut store = ScoreStore::in_memory();
        let first = store.insert("Al", 50, 1, 1000).unwrap();
        let second = store.insert("Bo", 70, 1, 2000).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_count_above_is_strict() {
        let mut store = ScoreStore::in_memory();
        store.insert("a", 100, 1, 0).unwrap();
        store.insert("b", 50, 1, 0).unwrap();
        store.insert("c", 50, 1, 0).unwrap();
        store.insert("d", 10, 1, 0).unwrap();

        assert_eq!(store.count_above(50).unwrap(), 1);
        assert_eq!(store.count_above(100).unwrap(), 0);
        assert_eq!(store.count_above(5).unwrap(), 4);
    }

    #[test]
    fn test_top_orders_by_score_then_insertion() {
        let mut store = ScoreStore::in_memory();
        store.insert("low", 10, 1, 0).unwrap();
        store.insert("tie-first", 80, 1, 0).unwrap();
        store.insert("high", 150, 1, 0).unwrap();
        store.insert("tie-second", 80, 1, 0).unwrap();

        let names: Vec<String> = store.top(10).unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["high", "tie-first", "tie-second", "low"]);
    }

    #[test]
    fn test_top_respects_limit() {
        let mut store = ScoreStore::in_memory();
        for i in 0..25 {
            store.insert(&format!("p{}", i), i + 1, 1, 0).unwrap();
        }
        let top = store.top(10).unwrap();
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].score, 25);
        assert_eq!(top[9].score, 16);
    }

    #[test]
    fn test_unavailable_store_rejects_everything() {
        let mut store = ScoreStore::unavailable();
        assert!(matches!(
            store.insert("Al", 50, 1, 0),
            Err(StoreError::Unavailable)
        ));
        assert!(matches!(store.count_above(0), Err(StoreError::Unavailable)));
        assert!(matches!(store.top(10), Err(StoreError::Unavailable)));
    }

    #[test]
    fn test_snapshot_survives_reopen() {
        let path = temp_snapshot_path("reopen");

        {
            let mut store = ScoreStore::open(&path).unwrap();
            store.insert("Al", 50, 1, 1000).unwrap();
            store.insert("Bo", 90, 2, 2000).unwrap();
        }

        let mut store = ScoreStore::open(&path).unwrap();
        assert_eq!(store.len(), 2);
        let next = store.insert("Cy", 30, 1, 3000).unwrap();
        assert_eq!(next.id, 3);
        assert_eq!(store.top(1).unwrap()[0].name, "Bo");
    }

    #[test]
    fn test_corrupt_snapshot_fails_to_open() {
        let path = temp_snapshot_path("corrupt");
        fs::write(&path, [0xFF, 0x01]).unwrap();
        assert!(matches!(ScoreStore::open(&path), Err(StoreError::Encode(_))));
    }

    #[test]
    fn test_failed_persist_rolls_back() {
        let path = temp_snapshot_path("rollback");
        let mut store = ScoreStore::open(&path).unwrap();

        // Snapshot target is now a directory, so the rename fails.
        fs::create_dir_all(&path).unwrap();

        assert!(matches!(
            store.insert("Al", 50, 1, 0),
            Err(StoreError::Io(_))
        ));
        assert!(store.is_empty());

        fs::remove_dir_all(&path).unwrap();
        let row = store.insert("Al", 50, 1, 0).unwrap();
        assert_eq!(row.id, 1);
    }
}
