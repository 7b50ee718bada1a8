use super::board::Board;
use serde::{Deserialize, Serialize};

pub const UNTITLED_LIST: &str = "Untitled List";

/// One ranked value as persisted in a priority list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredValue {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub is_highlighted: bool,
}

/// Persisted board snapshot: the selected group, in rank order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ListValuesRepr")]
pub struct ListValues {
    pub selected_group_values: Vec<StoredValue>,
}

/// Accepted shapes on read: the current object, the legacy `column4` object,
/// or a bare array of values.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListValuesRepr {
    Array(Vec<StoredValue>),
    Object {
        #[serde(default, rename = "selectedGroupValues")]
        selected_group_values: Option<Vec<StoredValue>>,
        #[serde(default)]
        column4: Option<LegacyColumn>,
    },
}

#[derive(Deserialize)]
struct LegacyColumn {
    #[serde(default)]
    values: Vec<StoredValue>,
}

impl From<ListValuesRepr> for ListValues {
    fn from(repr: ListValuesRepr) -> Self {
        let selected_group_values = match repr {
            ListValuesRepr::Array(values) => values,
            ListValuesRepr::Object {
                selected_group_values: Some(values),
                ..
            } => values,
            ListValuesRepr::Object {
                column4: Some(column),
                ..
            } => column.values,
            ListValuesRepr::Object { .. } => Vec::new(),
        };
        Self {
            selected_group_values,
        }
    }
}

impl ListValues {
    pub fn from_board(board: &Board) -> Self {
        Self {
            selected_group_values: board
                .selected()
                .iter()
                .map(|v| StoredValue {
                    content: v.content.clone(),
                    id: v.id.clone(),
                    is_highlighted: v.is_highlighted,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.selected_group_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected_group_values.is_empty()
    }

    pub fn contents(&self) -> Vec<&str> {
        self.selected_group_values
            .iter()
            .map(|v| v.content.as_str())
            .collect()
    }
}

/// A saved priority list as returned by the list store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityList {
    pub id: String,
    pub list_name: String,
    pub values: ListValues,
    /// ISO-8601, normalized by the store adapter.
    pub created_at: String,
    pub updated_at: String,
}

impl PriorityList {
    pub fn summary(&self) -> ListSummary {
        ListSummary {
            id: self.id.clone(),
            list_name: self.list_name.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
            value_count: self.values.len(),
            offline: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSummary {
    pub id: String,
    pub list_name: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub value_count: usize,
    /// Still waiting in the offline queue; `id` is the queue entry id.
    #[serde(default)]
    pub offline: bool,
}

/// What a save writes: the list name plus its ranked values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPayload {
    pub list_name: String,
    pub values: ListValues,
}

impl ListPayload {
    pub fn new(list_name: impl Into<String>, values: ListValues) -> Self {
        Self {
            list_name: list_name.into(),
            values,
        }
    }
}

/// Body of `POST /lists`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub list_name: String,
    #[serde(default)]
    pub values: ListValues,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub success: bool,
    pub list_id: String,
}
