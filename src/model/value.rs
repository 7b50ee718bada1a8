use super::types::GroupId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueItem {
    pub id: String,
    pub content: String,

    #[serde(default)]
    pub is_highlighted: bool,

    /// Catalog group this value belongs to. Set once when the catalog is built.
    pub origin_group: GroupId,
}

impl ValueItem {
    pub fn new(id: impl Into<String>, content: impl Into<String>, origin_group: GroupId) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            is_highlighted: false,
            origin_group,
        }
    }

    pub fn highlighted(mut self) -> Self {
        self.is_highlighted = true;
        self
    }

    pub fn unhighlighted(mut self) -> Self {
        self.is_highlighted = false;
        self
    }
}
