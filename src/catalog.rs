//! The static catalog of values a user can pick from.
//!
//! The catalog partitions value names into the three source groups and
//! assigns each a stable `value-N` id. Ids are numbered across groups in
//! catalog order, so the built-in catalog uses `value-1`..`value-60`.

use crate::error::{RankError, Result};
use crate::model::{Board, GroupId, ValueItem};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

const PERSONAL_VALUES: [&str; 20] = [
    "Love",
    "Friendships",
    "Innovation",
    "Empathy",
    "Clear Direction",
    "Mental Health",
    "Happiness",
    "Authenticity",
    "Meaningful work",
    "Results",
    "Stability",
    "Freedom",
    "Communication",
    "Kindness",
    "Adventure",
    "Joy",
    "Courage",
    "Learning",
    "Challenges",
    "Passion",
];

const GROWTH_VALUES: [&str; 20] = [
    "Faith",
    "Change",
    "Simplicity",
    "Fun",
    "Balance",
    "Laughter",
    "Originality",
    "Compassion",
    "Generosity",
    "Nature/Outdoors",
    "Curiosity",
    "Relationships",
    "Accuracy",
    "Productivity",
    "Clarity",
    "Being Present",
    "Peace",
    "Excellence",
    "Creativity",
    "Belonging",
];

const LIFE_VALUES: [&str; 20] = [
    "Family",
    "Serving Others",
    "Leadership",
    "Solitude",
    "Time",
    "Honesty",
    "Nutrition",
    "Growing",
    "Mastery",
    "Optimism",
    "Determination",
    "Health",
    "Significance",
    "Teaching",
    "Resilience",
    "Teamwork",
    "Travel",
    "Connecting",
    "Recreation/Play",
    "Making a Difference",
];

#[derive(Debug, Clone)]
pub struct Catalog {
    groups: [Vec<ValueItem>; 3],
    index: HashMap<String, (GroupId, usize)>,
}

#[derive(Deserialize)]
struct CatalogFile {
    group: Vec<CatalogFileGroup>,
}

#[derive(Deserialize)]
struct CatalogFileGroup {
    id: GroupId,
    values: Vec<String>,
}

impl Catalog {
    pub fn builtin() -> Self {
        let groups = [
            (GroupId::Personal, PERSONAL_VALUES.to_vec()),
            (GroupId::Growth, GROWTH_VALUES.to_vec()),
            (GroupId::Life, LIFE_VALUES.to_vec()),
        ];
        match Self::from_groups(groups) {
            Ok(catalog) => catalog,
            Err(e) => unreachable!("built-in catalog is valid: {}", e),
        }
    }

    /// Builds a catalog from one list of names per source group.
    pub fn from_groups<S: AsRef<str>>(groups: [(GroupId, Vec<S>); 3]) -> Result<Self> {
        let mut slots: [Option<Vec<ValueItem>>; 3] = [None, None, None];
        let mut seen_content = HashSet::new();
        let mut next_id = 1usize;

        for (group_id, names) in groups {
            let slot = source_slot(group_id)?;
            if slots[slot].is_some() {
                return Err(RankError::Config(format!(
                    "Catalog lists group {} twice",
                    group_id
                )));
            }

            let mut values = Vec::with_capacity(names.len());
            for name in names {
                let content = name.as_ref().trim();
                if content.is_empty() {
                    return Err(RankError::Config(format!(
                        "Catalog group {} contains an empty value",
                        group_id
                    )));
                }
                if !seen_content.insert(content.to_lowercase()) {
                    return Err(RankError::Config(format!(
                        "Catalog value '{}' appears more than once",
                        content
                    )));
                }
                values.push(ValueItem::new(
                    format!("value-{}", next_id),
                    content,
                    group_id,
                ));
                next_id += 1;
            }
            slots[slot] = Some(values);
        }

        let [personal, growth, life] = slots;
        let groups = [
            personal.unwrap_or_default(),
            growth.unwrap_or_default(),
            life.unwrap_or_default(),
        ];
        if groups.iter().all(Vec::is_empty) {
            return Err(RankError::Config("Catalog has no values".to_string()));
        }

        let index = groups
            .iter()
            .flat_map(|values| values.iter().enumerate())
            .map(|(i, v)| (v.id.clone(), (v.origin_group, i)))
            .collect();

        Ok(Self { groups, index })
    }

    /// Loads a catalog from a TOML file with one `[[group]]` table per source group.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: CatalogFile = toml::from_str(&content)?;
        if file.group.len() != 3 {
            return Err(RankError::Config(format!(
                "Catalog must define exactly 3 groups, found {}",
                file.group.len()
            )));
        }
        let mut groups = file.group.into_iter().map(|g| (g.id, g.values));
        let (Some(a), Some(b), Some(c)) = (groups.next(), groups.next(), groups.next()) else {
            return Err(RankError::Config("Catalog must define 3 groups".to_string()));
        };
        Self::from_groups([a, b, c])
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn group(&self, id: GroupId) -> &[ValueItem] {
        match source_slot(id) {
            Ok(slot) => &self.groups[slot],
            Err(_) => &[],
        }
    }

    pub fn find(&self, value_id: &str) -> Option<&ValueItem> {
        let (group, i) = self.index.get(value_id)?;
        self.group(*group).get(*i)
    }

    pub fn origin_of(&self, value_id: &str) -> Option<GroupId> {
        self.index.get(value_id).map(|(group, _)| *group)
    }

    /// Case-insensitive lookup by display label.
    pub fn find_by_content(&self, content: &str) -> Option<&ValueItem> {
        let needle = content.trim().to_lowercase();
        self.groups
            .iter()
            .flatten()
            .find(|v| v.content.to_lowercase() == needle)
    }

    /// Position of a value within its origin group in catalog order.
    pub fn catalog_rank(&self, value_id: &str) -> Option<usize> {
        self.index.get(value_id).map(|(_, i)| *i)
    }

    /// A fresh board: every value in its origin group, nothing selected.
    pub fn initial_board(&self) -> Board {
        Board::from_parts(self.groups.clone(), Vec::new())
    }
}

fn source_slot(id: GroupId) -> Result<usize> {
    match id {
        GroupId::Personal => Ok(0),
        GroupId::Growth => Ok(1),
        GroupId::Life => Ok(2),
        GroupId::Selected => Err(RankError::Config(
            "The selected group cannot hold catalog values".to_string(),
        )),
    }
}
