//! Data models for valuerank.
//!
//! - [`ValueItem`]: one catalog value and its selection marker
//! - [`GroupId`]: the three source groups and the selected group
//! - [`Board`]: the four groups, with the selected group capped at [`MAX_SELECTED`]
//! - [`PriorityList`]: a saved, named ranking

mod board;
mod list;
mod types;
mod value;

pub use board::{Board, Group, MAX_SELECTED, StoredBoard};
pub use list::{
    ListPayload, ListSummary, ListValues, PriorityList, SaveRequest, SaveResponse, StoredValue,
    UNTITLED_LIST,
};
pub use types::GroupId;
pub use value::ValueItem;
