use crate::error::{RankError, Result};
use crate::model::{ListSummary, ListValues};
use crate::storage::LocalStorage;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

pub const OFFLINE_SAVES_KEY: &str = "offline_saves";
pub const OFFLINE_UPDATES_KEY: &str = "offline_updates";

/// A save that could not reach the remote store yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub id: String,
    pub user_id: String,
    /// Present for updates, absent for "save as new".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
    pub name: String,
    pub values: ListValues,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl QueueEntry {
    /// How a queued create shows up among the user's saved lists.
    pub fn offline_summary(&self) -> ListSummary {
        let timestamp = self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
        ListSummary {
            id: self.id.clone(),
            list_name: format!("{} (Offline)", self.name),
            created_at: timestamp.clone(),
            updated_at: timestamp,
            value_count: self.values.len(),
            offline: true,
        }
    }

    fn key(&self) -> &'static str {
        if self.list_id.is_some() {
            OFFLINE_UPDATES_KEY
        } else {
            OFFLINE_SAVES_KEY
        }
    }
}

/// Durable FIFO of pending saves, split over two storage keys.
///
/// Reads present one view: creates first, then updates, each in insertion order.
pub struct SyncQueue {
    storage: Arc<dyn LocalStorage>,
    lock: Mutex<()>,
}

impl SyncQueue {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            storage,
            lock: Mutex::new(()),
        }
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_key(&self, key: &str) -> Result<Vec<QueueEntry>> {
        match self.storage.get_item(key)? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    fn write_key(&self, key: &str, entries: &[QueueEntry]) -> Result<()> {
        if entries.is_empty() {
            return self.storage.remove_item(key);
        }
        self.storage.set_item(key, &serde_json::to_string(entries)?)
    }

    pub fn enqueue(
        &self,
        user_id: &str,
        list_id: Option<&str>,
        name: &str,
        values: ListValues,
    ) -> Result<QueueEntry> {
        let entry = QueueEntry {
            id: nanoid::nanoid!(12),
            user_id: user_id.to_string(),
            list_id: list_id.map(str::to_string),
            name: name.to_string(),
            values,
            timestamp: Utc::now(),
            attempts: 0,
            last_error: None,
        };

        let _guard = self.guard();
        let mut entries = self.read_key(entry.key())?;
        entries.push(entry.clone());
        self.write_key(entry.key(), &entries)?;

        tracing::info!(
            entry_id = %entry.id,
            user_id,
            list_id = ?list_id,
            "Queued offline save"
        );
        Ok(entry)
    }

    pub fn entries(&self) -> Result<Vec<QueueEntry>> {
        let _guard = self.guard();
        let mut entries = self.read_key(OFFLINE_SAVES_KEY)?;
        entries.extend(self.read_key(OFFLINE_UPDATES_KEY)?);
        Ok(entries)
    }

    pub fn pending(&self, user_id: &str) -> Result<Vec<QueueEntry>> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|e| e.user_id == user_id)
            .collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.entries()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Applies `f` to the entry with `entry_id` in whichever key holds it.
    /// Returns false when no such entry exists.
    fn modify<F>(&self, entry_id: &str, f: F) -> Result<bool>
    where
        F: FnOnce(&mut Vec<QueueEntry>, usize),
    {
        let _guard = self.guard();
        for key in [OFFLINE_SAVES_KEY, OFFLINE_UPDATES_KEY] {
            let mut entries = self.read_key(key)?;
            if let Some(pos) = entries.iter().position(|e| e.id == entry_id) {
                f(&mut entries, pos);
                self.write_key(key, &entries)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Drops one entry after it was written remotely.
    pub fn remove(&self, entry_id: &str) -> Result<bool> {
        self.modify(entry_id, |entries, pos| {
            entries.remove(pos);
        })
    }

    pub fn record_failure(&self, entry_id: &str, error: &str) -> Result<bool> {
        self.modify(entry_id, |entries, pos| {
            let entry = &mut entries[pos];
            entry.attempts += 1;
            entry.last_error = Some(error.to_string());
        })
    }

    /// Drops a pending save without writing it.
    pub fn discard(&self, entry_id: &str) -> Result<()> {
        if !self.remove(entry_id)? {
            return Err(RankError::NotFound(format!("pending save {}", entry_id)));
        }
        tracing::info!(entry_id, "Discarded pending save");
        Ok(())
    }
}
