use super::local::LocalStorage;
use crate::model::{Board, StoredBoard};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Written as `{data, timestamp}`. Reads come back as a [`StoredBoard`] that
/// still needs resolving against the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupSnapshot<B = Board> {
    pub data: B,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupStatus {
    Written,
    Failed(String),
}

/// Single-slot, time-limited cache of the board.
///
/// Not a source of truth: a missing or stale snapshot just means a cold start.
pub struct BackupStore {
    storage: Arc<dyn LocalStorage>,
    key: String,
    expiry: Duration,
    has_pending_changes: AtomicBool,
}

impl BackupStore {
    pub fn new(storage: Arc<dyn LocalStorage>, key: impl Into<String>, expiry_hours: u64) -> Self {
        Self {
            storage,
            key: key.into(),
            expiry: Duration::hours(expiry_hours as i64),
            has_pending_changes: AtomicBool::new(false),
        }
    }

    /// Overwrites the snapshot. Errors are logged, never returned.
    pub fn write(&self, board: &Board) -> BackupStatus {
        self.write_at(board, Utc::now())
    }

    pub fn write_at(&self, board: &Board, timestamp: DateTime<Utc>) -> BackupStatus {
        let snapshot = BackupSnapshot {
            data: board.clone(),
            timestamp,
        };
        let result = serde_json::to_string(&snapshot)
            .map_err(crate::error::RankError::from)
            .and_then(|json| self.storage.set_item(&self.key, &json));

        match result {
            Ok(()) => {
                self.has_pending_changes.store(true, Ordering::Relaxed);
                BackupStatus::Written
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to write board backup");
                BackupStatus::Failed(e.user_message())
            }
        }
    }

    /// Returns the snapshot if it is younger than the expiry window.
    pub fn read(&self) -> Option<BackupSnapshot<StoredBoard>> {
        self.read_at(Utc::now())
    }

    pub fn read_at(&self, now: DateTime<Utc>) -> Option<BackupSnapshot<StoredBoard>> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read board backup");
                return None;
            }
        };

        let snapshot: BackupSnapshot<StoredBoard> = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Ignoring unreadable board backup");
                return None;
            }
        };

        if now - snapshot.timestamp < self.expiry {
            Some(snapshot)
        } else {
            tracing::debug!(key = %self.key, timestamp = %snapshot.timestamp, "Board backup expired");
            None
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.storage.remove_item(&self.key) {
            tracing::warn!(key = %self.key, error = %e, "Failed to clear board backup");
        }
        self.has_pending_changes.store(false, Ordering::Relaxed);
    }

    /// True once a snapshot has been written by this store.
    pub fn has_pending_changes(&self) -> bool {
        self.has_pending_changes.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::storage::MemoryStorage;

    fn store(storage: Arc<dyn LocalStorage>) -> BackupStore {
        BackupStore::new(storage, "values_backup", 24)
    }

    #[test]
    fn test_write_then_read() {
        let backup = store(Arc::new(MemoryStorage::new()));
        let catalog = Catalog::builtin();
        let board = catalog.initial_board();

        assert!(!backup.has_pending_changes());
        assert_eq!(backup.write(&board), BackupStatus::Written);
        assert!(backup.has_pending_changes());
        let restored = backup.read().unwrap().data.resolve(&catalog).unwrap();
        assert_eq!(restored, board);
    }

    #[test]
    fn test_expired_snapshot_is_ignored() {
        let backup = store(Arc::new(MemoryStorage::new()));
        let board = Catalog::builtin().initial_board();
        let written = Utc::now() - Duration::hours(30);
        backup.write_at(&board, written);

        assert!(backup.read().is_none());
        assert!(backup.read_at(written + Duration::hours(23)).is_some());
        assert!(backup.read_at(written + Duration::hours(24)).is_none());
    }

    #[test]
    fn test_write_overwrites_previous_snapshot() {
        let backup = store(Arc::new(MemoryStorage::new()));
        let catalog = Catalog::builtin();
        let first = catalog.initial_board();
        let engine = crate::reorder::ReorderEngine::new(&catalog);
        let second = engine
            .toggle(&first, crate::model::GroupId::Personal, "value-1")
            .unwrap()
            .into_board(&first);

        backup.write(&first);
        backup.write(&second);
        let restored = backup.read().unwrap().data.resolve(&catalog).unwrap();
        assert_eq!(restored.selected_len(), 1);
    }

    #[test]
    fn test_quota_failure_is_reported_not_raised() {
        let backup = store(Arc::new(MemoryStorage::with_quota(16)));
        let status = backup.write(&Catalog::builtin().initial_board());
        assert!(matches!(status, BackupStatus::Failed(msg) if msg.contains("Storage limit")));
        assert!(backup.read().is_none());
        assert!(!backup.has_pending_changes());
    }

    #[test]
    fn test_garbage_snapshot_is_cold_start() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item("values_backup", "not json").unwrap();
        let backup = store(storage);
        assert!(backup.read().is_none());
    }

    #[test]
    fn test_clear() {
        let backup = store(Arc::new(MemoryStorage::new()));
        backup.write(&Catalog::builtin().initial_board());
        backup.clear();
        assert!(backup.read().is_none());
        assert!(!backup.has_pending_changes());
    }
}
