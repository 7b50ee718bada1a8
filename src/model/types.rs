use crate::error::{RankError, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Identifies one of the four board groups.
///
/// The wire names (`column1`..`column4`) match the stored document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupId {
    #[serde(rename = "column1")]
    Personal,
    #[serde(rename = "column2")]
    Growth,
    #[serde(rename = "column3")]
    Life,
    #[serde(rename = "column4")]
    Selected,
}

impl GroupId {
    pub const ALL: [GroupId; 4] = [
        GroupId::Personal,
        GroupId::Growth,
        GroupId::Life,
        GroupId::Selected,
    ];

    pub const SOURCES: [GroupId; 3] = [GroupId::Personal, GroupId::Growth, GroupId::Life];

    pub fn is_source(self) -> bool {
        !matches!(self, GroupId::Selected)
    }

    pub fn title(self) -> &'static str {
        match self {
            GroupId::Personal => "Personal Values",
            GroupId::Growth => "Growth Values",
            GroupId::Life => "Life Values",
            GroupId::Selected => "Your Top Values",
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            GroupId::Personal => "column1",
            GroupId::Growth => "column2",
            GroupId::Life => "column3",
            GroupId::Selected => "column4",
        }
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupId::Personal => write!(f, "personal"),
            GroupId::Growth => write!(f, "growth"),
            GroupId::Life => write!(f, "life"),
            GroupId::Selected => write!(f, "selected"),
        }
    }
}

impl FromStr for GroupId {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "personal" | "column1" | "1" => Ok(GroupId::Personal),
            "growth" | "column2" | "2" => Ok(GroupId::Growth),
            "life" | "column3" | "3" => Ok(GroupId::Life),
            "selected" | "top" | "column4" | "4" => Ok(GroupId::Selected),
            _ => Err(RankError::Validation(format!("Invalid group: {}", s))),
        }
    }
}
