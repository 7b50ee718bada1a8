use super::types::GroupId;
use super::value::ValueItem;
use crate::catalog::Catalog;
use crate::error::{RankError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Maximum number of values the selected group may hold.
pub const MAX_SELECTED: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub title: String,
    #[serde(default)]
    pub values: Vec<ValueItem>,
}

impl Group {
    pub fn empty(id: GroupId) -> Self {
        Self {
            id,
            title: id.title().to_string(),
            values: Vec::new(),
        }
    }

    pub fn with_values(id: GroupId, values: Vec<ValueItem>) -> Self {
        Self {
            id,
            title: id.title().to_string(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn position(&self, value_id: &str) -> Option<usize> {
        self.values.iter().position(|v| v.id == value_id)
    }
}

/// The four groups of the priority board.
///
/// Every group is always present; deserialization rejects a board missing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<GroupId, Group>", into = "BTreeMap<GroupId, Group>")]
pub struct Board {
    groups: BTreeMap<GroupId, Group>,
}

impl TryFrom<BTreeMap<GroupId, Group>> for Board {
    type Error = String;

    fn try_from(groups: BTreeMap<GroupId, Group>) -> std::result::Result<Self, Self::Error> {
        for id in GroupId::ALL {
            match groups.get(&id) {
                None => return Err(format!("board is missing group {}", id.wire_name())),
                Some(group) if group.id != id => {
                    return Err(format!(
                        "group stored under {} claims id {}",
                        id.wire_name(),
                        group.id.wire_name()
                    ));
                }
                Some(_) => {}
            }
        }
        Ok(Self { groups })
    }
}

impl From<Board> for BTreeMap<GroupId, Group> {
    fn from(board: Board) -> Self {
        board.groups
    }
}

impl Board {
    /// Builds a board from the three source groups and the selected group.
    pub fn from_parts(sources: [Vec<ValueItem>; 3], selected: Vec<ValueItem>) -> Self {
        let mut groups = BTreeMap::new();
        for (id, values) in GroupId::SOURCES.into_iter().zip(sources) {
            groups.insert(id, Group::with_values(id, values));
        }
        groups.insert(
            GroupId::Selected,
            Group::with_values(GroupId::Selected, selected),
        );
        Self { groups }
    }

    pub fn group(&self, id: GroupId) -> &Group {
        // Construction guarantees all four keys
        &self.groups[&id]
    }

    pub(crate) fn group_mut(&mut self, id: GroupId) -> &mut Group {
        self.groups
            .get_mut(&id)
            .unwrap_or_else(|| unreachable!("board always holds group {}", id))
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn selected(&self) -> &[ValueItem] {
        &self.group(GroupId::Selected).values
    }

    pub fn selected_len(&self) -> usize {
        self.group(GroupId::Selected).len()
    }

    pub fn total_items(&self) -> usize {
        self.groups.values().map(Group::len).sum()
    }

    /// Finds which group holds a value and at which index.
    pub fn locate(&self, value_id: &str) -> Option<(GroupId, usize)> {
        self.groups
            .values()
            .find_map(|g| g.position(value_id).map(|i| (g.id, i)))
    }

    /// Verifies item conservation against the catalog and the selected-group cap.
    pub fn check_invariants(&self, catalog: &Catalog) -> Result<()> {
        if self.selected_len() > MAX_SELECTED {
            return Err(RankError::CapacityExceeded { max: MAX_SELECTED });
        }

        let mut seen = HashSet::new();
        for group in self.groups.values() {
            for value in &group.values {
                if !seen.insert(value.id.as_str()) {
                    return Err(RankError::Validation(format!(
                        "Value {} appears more than once",
                        value.id
                    )));
                }
                if catalog.find(&value.id).is_none() {
                    return Err(RankError::ValueNotFound(value.id.clone()));
                }
                if group.id.is_source() && group.id != value.origin_group {
                    return Err(RankError::Validation(format!(
                        "Value {} sits in {} but belongs to {}",
                        value.id, group.id, value.origin_group
                    )));
                }
            }
        }

        if seen.len() != catalog.len() {
            return Err(RankError::Validation(format!(
                "Board holds {} values but the catalog has {}",
                seen.len(),
                catalog.len()
            )));
        }
        Ok(())
    }
}

/// A board as read back from a snapshot, before it is checked against a catalog.
///
/// Snapshots written by older builds carry no `originGroup` on their values;
/// [`StoredBoard::resolve`] fills those in from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoredBoard(BTreeMap<GroupId, StoredGroup>);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct StoredGroup {
    id: GroupId,
    #[serde(default)]
    values: Vec<StoredItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredItem {
    id: String,
    content: String,
    #[serde(default)]
    is_highlighted: bool,
    #[serde(default)]
    origin_group: Option<GroupId>,
}

impl StoredBoard {
    /// Turns the snapshot into a [`Board`] that satisfies the catalog's invariants.
    pub fn resolve(self, catalog: &Catalog) -> Result<Board> {
        let mut groups = BTreeMap::new();
        for (key, group) in self.0 {
            let values = group
                .values
                .into_iter()
                .map(|item| {
                    let origin_group = match item.origin_group {
                        Some(origin) => origin,
                        None => catalog
                            .origin_of(&item.id)
                            .ok_or_else(|| RankError::ValueNotFound(item.id.clone()))?,
                    };
                    Ok(ValueItem {
                        id: item.id,
                        content: item.content,
                        is_highlighted: item.is_highlighted,
                        origin_group,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            groups.insert(key, Group::with_values(group.id, values));
        }

        let board = Board::try_from(groups).map_err(RankError::Validation)?;
        board.check_invariants(catalog)?;
        Ok(board)
    }
}
