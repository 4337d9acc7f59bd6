//! Entity types that own permanent images.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Kind of record a permanent image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Resource,
    Event,
    Community,
    User,
    Shoutout,
}

/// Backing table for each entity type. Adding an entity type is one row here
/// plus the enum variant.
const ENTITY_TABLES: [(EntityType, &str, &str); 5] = [
    (EntityType::Resource, "resource", "resources"),
    (EntityType::Event, "event", "events"),
    (EntityType::Community, "community", "communities"),
    (EntityType::User, "user", "profiles"),
    (EntityType::Shoutout, "shoutout", "shoutouts"),
];

impl EntityType {
    pub const ALL: [EntityType; 5] = [
        EntityType::Resource,
        EntityType::Event,
        EntityType::Community,
        EntityType::User,
        EntityType::Shoutout,
    ];

    fn row(self) -> (EntityType, &'static str, &'static str) {
        ENTITY_TABLES
            .iter()
            .copied()
            .find(|(entity_type, _, _)| *entity_type == self)
            .unwrap_or((self, "", ""))
    }

    /// Name used in permanent filenames (`{name}-{id}-...`).
    pub fn as_str(self) -> &'static str {
        self.row().1
    }

    /// Database table holding rows of this entity type.
    pub fn table_name(self) -> &'static str {
        self.row().2
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown entity type: {0}")]
pub struct UnknownEntityType(pub String);

impl FromStr for EntityType {
    type Err = UnknownEntityType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ENTITY_TABLES
            .iter()
            .find(|(_, name, _)| *name == s)
            .map(|(entity_type, _, _)| *entity_type)
            .ok_or_else(|| UnknownEntityType(s.to_string()))
    }
}

impl Display for EntityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
