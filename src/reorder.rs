//! Board reordering.
//!
//! Every change to a [`Board`] goes through [`ReorderEngine::move_value`].
//! Click-to-toggle and clearing the selection are expressed in terms of it.
//! Operations never mutate the board they are given; a change yields a whole
//! new board for the caller to swap in.

use crate::catalog::Catalog;
use crate::error::{RankError, Result};
use crate::model::{Board, GroupId, MAX_SELECTED};

/// A position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub group: GroupId,
    pub index: usize,
}

impl Slot {
    pub fn new(group: GroupId, index: usize) -> Self {
        Self { group, index }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Unchanged,
    Moved {
        board: Board,
        value_id: String,
        landed: Slot,
    },
}

impl Outcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, Outcome::Moved { .. })
    }

    /// The board after the operation, falling back to `current` when nothing moved.
    pub fn into_board(self, current: &Board) -> Board {
        match self {
            Outcome::Unchanged => current.clone(),
            Outcome::Moved { board, .. } => board,
        }
    }
}

pub struct ReorderEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> ReorderEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Moves the value at `from` to `to`.
    ///
    /// Destination indices past the end of a group are clamped to its length.
    pub fn move_value(&self, board: &Board, from: Slot, to: Slot) -> Result<Outcome> {
        if from == to {
            return Ok(Outcome::Unchanged);
        }

        let source = board.group(from.group);
        let Some(item) = source.values.get(from.index) else {
            return Err(RankError::InvalidSlot {
                group: from.group.to_string(),
                index: from.index,
            });
        };

        if from.group == to.group {
            let mut next = board.clone();
            let values = &mut next.group_mut(from.group).values;
            let moved = values.remove(from.index);
            let dest = to.index.min(values.len());
            if dest == from.index {
                return Ok(Outcome::Unchanged);
            }
            let value_id = moved.id.clone();
            values.insert(dest, moved);
            return Ok(Outcome::Moved {
                board: next,
                value_id,
                landed: Slot::new(from.group, dest),
            });
        }

        if to.group == GroupId::Selected {
            if board.selected_len() >= MAX_SELECTED {
                tracing::debug!(value_id = %item.id, "Selected group is full");
                return Err(RankError::CapacityExceeded { max: MAX_SELECTED });
            }
            let mut next = board.clone();
            let moved = next.group_mut(from.group).values.remove(from.index);
            let selected = &mut next.group_mut(GroupId::Selected).values;
            let dest = to.index.min(selected.len());
            let value_id = moved.id.clone();
            selected.insert(dest, moved.highlighted());
            return Ok(Outcome::Moved {
                board: next,
                value_id,
                landed: Slot::new(GroupId::Selected, dest),
            });
        }

        if from.group == GroupId::Selected {
            let origin = item.origin_group;
            if !origin.is_source() {
                return Err(RankError::Validation(format!(
                    "Value {} has no source group to return to",
                    item.id
                )));
            }
            let mut next = board.clone();
            let moved = next
                .group_mut(GroupId::Selected)
                .values
                .remove(from.index);
            let dest = if to.group == origin {
                to.index.min(next.group(origin).len())
            } else {
                self.home_index(&next, origin, &moved.id)
            };
            let value_id = moved.id.clone();
            next.group_mut(origin)
                .values
                .insert(dest, moved.unhighlighted());
            return Ok(Outcome::Moved {
                board: next,
                value_id,
                landed: Slot::new(origin, dest),
            });
        }

        // Source groups have fixed membership
        tracing::debug!(
            value_id = %item.id,
            from = %from.group,
            to = %to.group,
            "Ignoring move between source groups"
        );
        Ok(Outcome::Unchanged)
    }

    /// Click behaviour: a source value goes to the end of the selection, a
    /// selected value goes back to its origin group.
    pub fn toggle(&self, board: &Board, group: GroupId, value_id: &str) -> Result<Outcome> {
        let index = board
            .group(group)
            .position(value_id)
            .ok_or_else(|| RankError::ValueNotFound(value_id.to_string()))?;

        if group == GroupId::Selected {
            let origin = board.group(group).values[index].origin_group;
            let home = self.home_index(board, origin, value_id);
            self.move_value(board, Slot::new(group, index), Slot::new(origin, home))
        } else {
            let end = board.selected_len();
            self.move_value(
                board,
                Slot::new(group, index),
                Slot::new(GroupId::Selected, end),
            )
        }
    }

    /// Toggles the value named by `key`, matched as an id first and then as a
    /// case-insensitive label, wherever it currently sits.
    pub fn select_by_content(&self, board: &Board, key: &str) -> Result<Outcome> {
        let item = self
            .catalog
            .find(key.trim())
            .or_else(|| self.catalog.find_by_content(key))
            .ok_or_else(|| RankError::ValueNotFound(key.to_string()))?;
        let (group, _) = board
            .locate(&item.id)
            .ok_or_else(|| RankError::ValueNotFound(item.id.clone()))?;
        self.toggle(board, group, &item.id)
    }

    /// Returns every selected value to its origin group.
    pub fn clear_selected(&self, board: &Board) -> Result<Outcome> {
        let mut current = board.clone();
        let mut changed = false;
        while let Some(first) = current.selected().first() {
            let id = first.id.clone();
            match self.toggle(&current, GroupId::Selected, &id)? {
                Outcome::Moved { board, .. } => {
                    current = board;
                    changed = true;
                }
                Outcome::Unchanged => break,
            }
        }
        if !changed {
            return Ok(Outcome::Unchanged);
        }
        Ok(Outcome::Moved {
            board: current,
            value_id: String::new(),
            landed: Slot::new(GroupId::Selected, 0),
        })
    }

    /// Index at which a returning value re-enters its origin group: before
    /// the first value that comes after it in catalog order.
    fn home_index(&self, board: &Board, origin: GroupId, value_id: &str) -> usize {
        let group = board.group(origin);
        let Some(rank) = self.catalog.catalog_rank(value_id) else {
            return group.len();
        };
        group
            .values
            .iter()
            .position(|v| {
                self.catalog
                    .catalog_rank(&v.id)
                    .is_some_and(|other| other > rank)
            })
            .unwrap_or(group.len())
    }
}
