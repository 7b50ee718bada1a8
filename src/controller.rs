//! Owner of the live board.
//!
//! [`BoardController`] holds the one mutable [`Board`], applies reorder
//! outcomes by swapping the whole value, and rewrites the local backup after
//! every change.

use crate::catalog::Catalog;
use crate::error::Result;
use crate::model::{Board, GroupId};
use crate::reorder::{Outcome, ReorderEngine, Slot};
use crate::storage::{BackupStatus, BackupStore};
use std::sync::Arc;

pub struct BoardController {
    catalog: Arc<Catalog>,
    board: Board,
    backup: BackupStore,
    backup_status: BackupStatus,
}

impl BoardController {
    /// Starts from the backup when a fresh, consistent one exists, otherwise
    /// from the catalog's initial board.
    pub fn restore(catalog: Arc<Catalog>, backup: BackupStore) -> Self {
        let board = match backup.read() {
            Some(snapshot) => match snapshot.data.resolve(&catalog) {
                Ok(board) => {
                    tracing::debug!(timestamp = %snapshot.timestamp, "Restored board from backup");
                    board
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Backup does not match the catalog, starting fresh");
                    catalog.initial_board()
                }
            },
            None => catalog.initial_board(),
        };

        Self {
            catalog,
            board,
            backup,
            backup_status: BackupStatus::Written,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Result of the most recent backup write.
    pub fn backup_status(&self) -> &BackupStatus {
        &self.backup_status
    }

    pub fn has_pending_changes(&self) -> bool {
        self.backup.has_pending_changes()
    }

    pub fn move_value(&mut self, from: Slot, to: Slot) -> Result<bool> {
        let outcome = ReorderEngine::new(&self.catalog).move_value(&self.board, from, to)?;
        Ok(self.apply(outcome))
    }

    pub fn toggle(&mut self, group: GroupId, value_id: &str) -> Result<bool> {
        let outcome = ReorderEngine::new(&self.catalog).toggle(&self.board, group, value_id)?;
        Ok(self.apply(outcome))
    }

    /// Toggles a value given by id or display label.
    pub fn pick(&mut self, key: &str) -> Result<bool> {
        let outcome = ReorderEngine::new(&self.catalog).select_by_content(&self.board, key)?;
        Ok(self.apply(outcome))
    }

    pub fn clear(&mut self) -> Result<bool> {
        let outcome = ReorderEngine::new(&self.catalog).clear_selected(&self.board)?;
        Ok(self.apply(outcome))
    }

    /// Swaps in a board built elsewhere, e.g. a loaded list.
    pub fn replace(&mut self, board: Board) -> Result<()> {
        board.check_invariants(&self.catalog)?;
        self.board = board;
        self.persist();
        Ok(())
    }

    fn apply(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Unchanged => false,
            Outcome::Moved {
                board,
                value_id,
                landed,
            } => {
                tracing::debug!(value_id = %value_id, group = %landed.group, index = landed.index, "Board changed");
                self.board = board;
                self.persist();
                true
            }
        }
    }

    fn persist(&mut self) {
        self.backup_status = self.backup.write(&self.board);
    }
}
