use super::connectivity::Connectivity;
use super::queue::{QueueEntry, SyncQueue};
use super::retry::{BackoffPolicy, with_retry};
use crate::catalog::Catalog;
use crate::error::{RankError, Result};
use crate::model::{
    Board, GroupId, ListPayload, ListSummary, ListValues, MAX_SELECTED, StoredValue, ValueItem,
};
use crate::remote::{RemoteError, RemoteListStore};
use crate::validation;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { list_id: String },
    /// Queued locally. `notify` is set when the cause was being offline.
    SavedOffline { entry_id: String, notify: bool },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub succeeded: usize,
    /// Retryable failures, still queued.
    pub failed: usize,
    /// Entries the store rejected outright, removed from the queue.
    pub dropped: usize,
    /// Entries not attempted because the connection dropped mid-pass.
    pub skipped: usize,
}

impl ReplayReport {
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed + self.dropped
    }

    pub fn message(&self) -> String {
        if self.attempted() == 0 {
            let message = if self.skipped > 0 {
                "Cannot sync while offline"
            } else {
                "Nothing to sync"
            };
            return message.to_string();
        }
        if self.attempted() == self.succeeded && self.skipped == 0 {
            let n = self.succeeded;
            return format!("Synced {} offline change{}", n, plural(n));
        }

        let mut message = format!(
            "Synced {} of {} offline changes",
            self.succeeded,
            self.attempted() + self.skipped
        );
        if self.failed > 0 {
            message.push_str(&format!(", {} failed", self.failed));
        }
        if self.dropped > 0 {
            message.push_str(&format!(", {} rejected and discarded", self.dropped));
        }
        if self.skipped > 0 {
            message.push_str(&format!(", {} waiting for connection", self.skipped));
        }
        message
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Marks a list key as saving until dropped.
struct SaveGuard<'a> {
    in_flight: &'a Mutex<HashSet<String>>,
    key: String,
}

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        in_flight.remove(&self.key);
    }
}

/// Saves, loads and replays priority lists against a remote store,
/// queueing writes locally whenever the remote cannot take them.
pub struct SaveService {
    store: Arc<dyn RemoteListStore>,
    queue: SyncQueue,
    connectivity: Connectivity,
    policy: BackoffPolicy,
    catalog: Arc<Catalog>,
    in_flight: Mutex<HashSet<String>>,
    replay_lock: tokio::sync::Mutex<()>,
}

impl SaveService {
    pub fn new(
        store: Arc<dyn RemoteListStore>,
        queue: SyncQueue,
        connectivity: Connectivity,
        policy: BackoffPolicy,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            store,
            queue,
            connectivity,
            policy,
            catalog,
            in_flight: Mutex::new(HashSet::new()),
            replay_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn queue(&self) -> &SyncQueue {
        &self.queue
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn is_saving(&self, key: &str) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(key)
    }

    fn begin_save(&self, key: String) -> Result<SaveGuard<'_>> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !in_flight.insert(key.clone()) {
            tracing::debug!(key = %key, "Rejected concurrent save");
            return Err(RankError::SaveInProgress(key));
        }
        Ok(SaveGuard {
            in_flight: &self.in_flight,
            key,
        })
    }

    /// Saves the selected group as a new list.
    pub async fn save_as(&self, user_id: &str, name: &str, board: &Board) -> Result<SaveOutcome> {
        validation::validate_user_id(user_id)?;
        validation::validate_list_name(name)?;
        let name = name.trim();
        let _guard = self.begin_save(format!("new:{}", name))?;
        let payload = ListPayload::new(name, ListValues::from_board(board));
        self.write(user_id, None, payload).await
    }

    /// Overwrites an existing list with the selected group.
    pub async fn update(
        &self,
        user_id: &str,
        list_id: &str,
        name: &str,
        board: &Board,
    ) -> Result<SaveOutcome> {
        validation::validate_user_id(user_id)?;
        validation::validate_list_id(list_id)?;
        validation::validate_list_name(name)?;
        let _guard = self.begin_save(list_id.to_string())?;
        let payload = ListPayload::new(name.trim(), ListValues::from_board(board));
        self.write(user_id, Some(list_id), payload).await
    }

    async fn write(
        &self,
        user_id: &str,
        list_id: Option<&str>,
        payload: ListPayload,
    ) -> Result<SaveOutcome> {
        if !self.connectivity.is_online() {
            tracing::info!(user_id, list_id = ?list_id, "Offline, queueing save");
            let entry = self.enqueue(user_id, list_id, payload, None)?;
            return Ok(SaveOutcome::SavedOffline {
                entry_id: entry.id,
                notify: true,
            });
        }

        let body = &payload;
        let result = with_retry(&self.policy, move |_| {
            self.remote_write(user_id, list_id, body)
        })
        .await;

        match result {
            Ok(list_id) => {
                tracing::info!(user_id, list_id = %list_id, "Saved priority list");
                Ok(SaveOutcome::Saved { list_id })
            }
            Err(e) if !e.is_retryable() => {
                tracing::warn!(user_id, list_id = ?list_id, error = %e, "Save rejected");
                Err(e.into())
            }
            Err(e) => {
                tracing::warn!(
                    user_id,
                    list_id = ?list_id,
                    error = %e,
                    "Remote unreachable after retries, queueing save"
                );
                let entry = self.enqueue(user_id, list_id, payload, Some(&e))?;
                Ok(SaveOutcome::SavedOffline {
                    entry_id: entry.id,
                    notify: false,
                })
            }
        }
    }

    async fn remote_write(
        &self,
        user_id: &str,
        list_id: Option<&str>,
        payload: &ListPayload,
    ) -> std::result::Result<String, RemoteError> {
        match list_id {
            Some(id) => {
                self.store.update(user_id, id, payload).await?;
                Ok(id.to_string())
            }
            None => self.store.create(user_id, payload).await,
        }
    }

    fn enqueue(
        &self,
        user_id: &str,
        list_id: Option<&str>,
        payload: ListPayload,
        cause: Option<&RemoteError>,
    ) -> Result<QueueEntry> {
        let entry = self
            .queue
            .enqueue(user_id, list_id, &payload.list_name, payload.values)?;
        if let Some(cause) = cause {
            self.queue.record_failure(&entry.id, &cause.to_string())?;
        }
        Ok(entry)
    }

    /// Reads a saved list and rebuilds the full board from it.
    pub async fn load(&self, user_id: &str, list_id: &str) -> Result<Board> {
        validation::validate_user_id(user_id)?;
        validation::validate_list_id(list_id)?;
        let list = self
            .store
            .get(user_id, list_id)
            .await?
            .ok_or_else(|| RankError::NotFound(list_id.to_string()))?;
        tracing::info!(user_id, list_id, values = list.values.len(), "Loaded priority list");
        Ok(rebuild_board(&self.catalog, &list.values.selected_group_values))
    }

    /// Saved lists, newest first, followed by new lists still waiting in the
    /// offline queue. Queued lists whose name is already saved are left out.
    /// If the store cannot be reached, only the queued lists are returned.
    pub async fn lists(&self, user_id: &str) -> Result<Vec<ListSummary>> {
        validation::validate_user_id(user_id)?;
        let queued: Vec<QueueEntry> = self
            .queue
            .pending(user_id)?
            .into_iter()
            .filter(|entry| entry.list_id.is_none())
            .collect();

        match self.store.list(user_id).await {
            Ok(mut lists) => {
                let offline: Vec<_> = queued
                    .iter()
                    .filter(|entry| !lists.iter().any(|l| l.list_name == entry.name))
                    .map(QueueEntry::offline_summary)
                    .collect();
                lists.extend(offline);
                Ok(lists)
            }
            Err(e) if e.is_retryable() => {
                tracing::warn!(user_id, error = %e, "Store unreachable, showing offline lists only");
                Ok(queued.iter().map(QueueEntry::offline_summary).collect())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, user_id: &str, list_id: &str) -> Result<()> {
        validation::validate_user_id(user_id)?;
        validation::validate_list_id(list_id)?;
        self.store.delete(user_id, list_id).await?;
        tracing::info!(user_id, list_id, "Deleted priority list");
        Ok(())
    }

    /// One pass over the user's pending saves, oldest first, each tried once.
    pub async fn replay(&self, user_id: &str) -> Result<ReplayReport> {
        let _pass = self.replay_lock.lock().await;
        let pending = self.queue.pending(user_id)?;
        let mut report = ReplayReport::default();

        for (i, entry) in pending.iter().enumerate() {
            if !self.connectivity.is_online() {
                report.skipped = pending.len() - i;
                tracing::info!(user_id, skipped = report.skipped, "Went offline during replay");
                break;
            }

            let payload = ListPayload::new(entry.name.clone(), entry.values.clone());
            match self
                .remote_write(&entry.user_id, entry.list_id.as_deref(), &payload)
                .await
            {
                Ok(list_id) => {
                    self.queue.remove(&entry.id)?;
                    report.succeeded += 1;
                    tracing::info!(entry_id = %entry.id, list_id = %list_id, "Replayed offline save");
                }
                Err(e) if !e.is_retryable() => {
                    self.queue.remove(&entry.id)?;
                    report.dropped += 1;
                    tracing::warn!(
                        entry_id = %entry.id,
                        list_id = ?entry.list_id,
                        name = %entry.name,
                        error = %e,
                        "Offline save rejected by the store, discarding it"
                    );
                }
                Err(e) => {
                    self.queue.record_failure(&entry.id, &e.to_string())?;
                    report.failed += 1;
                    tracing::warn!(entry_id = %entry.id, error = %e, "Offline save still failing");
                }
            }
        }

        Ok(report)
    }

    /// Replays the user's pending saves on every offline to online transition.
    pub fn spawn_reconnect_replay(self: &Arc<Self>, user_id: impl Into<String>) -> JoinHandle<()> {
        let service = Arc::clone(self);
        let user_id = user_id.into();
        let mut rx = self.connectivity.subscribe();
        let mut was_online = *rx.borrow_and_update();

        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let online = *rx.borrow_and_update();
                if online && !was_online {
                    match service.replay(&user_id).await {
                        Ok(report) if report.attempted() > 0 => {
                            tracing::info!(user_id = %user_id, "{}", report.message())
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::warn!(user_id = %user_id, error = %e, "Reconnect replay failed")
                        }
                    }
                }
                was_online = online;
            }
        })
    }
}

/// Selected values in saved order, every other catalog value back in its origin group.
fn rebuild_board(catalog: &Catalog, saved: &[StoredValue]) -> Board {
    let mut selected: Vec<ValueItem> = Vec::new();
    let mut taken = HashSet::new();

    for value in saved {
        let item = catalog
            .find(&value.id)
            .or_else(|| catalog.find_by_content(&value.content));
        let Some(item) = item else {
            tracing::warn!(value_id = %value.id, content = %value.content, "Dropping unknown value from saved list");
            continue;
        };
        if !taken.insert(item.id.clone()) {
            continue;
        }
        if selected.len() == MAX_SELECTED {
            tracing::warn!(value_id = %item.id, "Saved list exceeds capacity, truncating");
            break;
        }
        selected.push(item.clone().highlighted());
    }

    let sources = GroupId::SOURCES.map(|group| {
        catalog
            .group(group)
            .iter()
            .filter(|v| !taken.contains(&v.id))
            .cloned()
            .collect::<Vec<_>>()
    });
    Board::from_parts(sources, selected)
}
