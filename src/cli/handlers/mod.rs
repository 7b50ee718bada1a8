mod board;
mod init;
mod lists;
mod serve;
mod sync;
mod utils;

pub use board::{handle_board, handle_catalog, handle_clear, handle_move, handle_pick};
pub use init::handle_init;
pub use lists::{handle_delete, handle_lists, handle_load, handle_save};
pub use serve::handle_serve;
pub use sync::{handle_discard, handle_pending, handle_sync};

use crate::catalog::Catalog;
use crate::config::RankConfig;
use crate::controller::BoardController;
use crate::remote::{DocumentStore, HttpListStore, RemoteListStore};
use crate::storage::{BackupStore, FileStorage, LocalStorage, MemoryStorage};
use crate::sync::{Connectivity, SaveService, SyncQueue};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

/// Common context passed to all command handlers
pub struct CommandContext {
    pub config: RankConfig,
    pub root: PathBuf,
    pub catalog: Arc<Catalog>,
    pub storage: Arc<dyn LocalStorage>,
    pub offline: bool,
}

impl CommandContext {
    pub fn new(config: RankConfig, root: PathBuf, offline: bool) -> Result<Self> {
        let catalog = match config.catalog_path(&root) {
            Some(path) => Catalog::load(&path)
                .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
            None => Catalog::builtin(),
        };

        let local_path = config.local_storage_path(&root);
        let storage: Arc<dyn LocalStorage> =
            match FileStorage::open(&local_path, config.storage.quota_bytes) {
                Ok(storage) => Arc::new(storage),
                Err(e) => {
                    tracing::warn!(path = %local_path.display(), error = %e, "Local storage unavailable");
                    eprintln!(
                        "{} local storage is unavailable, running in local-only mode. Changes will not persist.",
                        "Warning:".yellow()
                    );
                    Arc::new(MemoryStorage::new())
                }
            };

        Ok(Self {
            config,
            root,
            catalog: Arc::new(catalog),
            storage,
            offline,
        })
    }

    pub fn controller(&self) -> BoardController {
        let backup = BackupStore::new(
            self.storage.clone(),
            self.config.backup.key.clone(),
            self.config.backup.expiry_hours,
        );
        BoardController::restore(self.catalog.clone(), backup)
    }

    pub fn remote_store(&self) -> Result<Arc<dyn RemoteListStore>> {
        match self.config.remote.url() {
            Some(url) => Ok(Arc::new(HttpListStore::new(url)?)),
            None => Ok(Arc::new(DocumentStore::new(
                &self.config.document_store_path(&self.root),
            ))),
        }
    }

    pub fn save_service(&self) -> Result<SaveService> {
        Ok(SaveService::new(
            self.remote_store()?,
            SyncQueue::new(self.storage.clone()),
            Connectivity::new(!self.offline),
            self.config.sync.backoff_policy(),
            self.catalog.clone(),
        ))
    }
}
