//! Typed view of image storage paths.
//!
//! Paths have the form `{owner}/{filename}`:
//!
//! - temporary: `{owner}/temp-upload-{timestamp}-{random}.{ext}`
//! - permanent: `{owner}/{entityType}-{entityId}-{timestamp}-{random}.{ext}`
//!
//! The `{timestamp}-{random}.{ext}` suffix is carried over unchanged when a
//! temporary object is committed, so one upload can be traced through both states.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::constants::TEMP_MARKER;
use crate::models::EntityType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoragePath {
    Temporary {
        owner: String,
        /// Text before the marker; empty for paths produced by the upload stage.
        lead: String,
        suffix: String,
    },
    Permanent {
        owner: String,
        entity_type: EntityType,
        entity_id: String,
        suffix: String,
    },
    /// Permanent-shaped filename whose entity type is not one we know.
    Foreign { owner: String, filename: String },
}

/// Last `/`-delimited component of a path.
pub fn filename_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// True iff the filename component contains the temporary marker.
pub fn is_temporary(path: &str) -> bool {
    filename_of(path).contains(TEMP_MARKER)
}

/// `{entityType}-{entityId}-{suffix}`
pub fn build_permanent_segment(entity_type: EntityType, entity_id: &str, suffix: &str) -> String {
    format!("{}-{}-{}", entity_type, entity_id, suffix)
}

/// Portion of a temporary filename after the marker.
///
/// Returns `None` for filenames with fewer than three hyphen-delimited
/// components or nothing after the marker.
pub fn temporary_suffix(filename: &str) -> Option<&str> {
    if filename.split('-').count() < 3 {
        return None;
    }
    let start = filename.find(TEMP_MARKER)? + TEMP_MARKER.len();
    let suffix = &filename[start..];
    if suffix.is_empty() {
        None
    } else {
        Some(suffix)
    }
}

impl StoragePath {
    /// Parse a bucket-relative path. Returns `None` when the path has no owner
    /// folder or the filename does not follow either naming scheme.
    pub fn parse(path: &str) -> Option<Self> {
        let (owner, filename) = path.rsplit_once('/')?;
        if owner.is_empty() || filename.is_empty() {
            return None;
        }
        let owner = owner.to_string();

        if filename.contains(TEMP_MARKER) {
            let suffix = temporary_suffix(filename)?;
            let lead_end = filename.len() - suffix.len() - TEMP_MARKER.len();
            return Some(StoragePath::Temporary {
                owner,
                lead: filename[..lead_end].to_string(),
                suffix: suffix.to_string(),
            });
        }

        // {entityType}-{entityId...}-{timestamp}-{random}.{ext}; ids may contain hyphens
        let parts: Vec<&str> = filename.split('-').collect();
        if parts.len() < 4 {
            return None;
        }
        let suffix = parts[parts.len() - 2..].join("-");
        let entity_id = parts[1..parts.len() - 2].join("-");
        if entity_id.is_empty() || parts[0].is_empty() {
            return None;
        }

        match parts[0].parse::<EntityType>() {
            Ok(entity_type) => Some(StoragePath::Permanent {
                owner,
                entity_type,
                entity_id,
                suffix,
            }),
            Err(_) => Some(StoragePath::Foreign {
                owner,
                filename: filename.to_string(),
            }),
        }
    }

    pub fn owner(&self) -> &str {
        match self {
            StoragePath::Temporary { owner, .. }
            | StoragePath::Permanent { owner, .. }
            | StoragePath::Foreign { owner, .. } => owner,
        }
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, StoragePath::Temporary { .. })
    }

    pub fn filename(&self) -> String {
        match self {
            StoragePath::Temporary { lead, suffix, .. } => {
                format!("{}{}{}", lead, TEMP_MARKER, suffix)
            }
            StoragePath::Permanent {
                entity_type,
                entity_id,
                suffix,
                ..
            } => build_permanent_segment(*entity_type, entity_id, suffix),
            StoragePath::Foreign { filename, .. } => filename.clone(),
        }
    }

    /// The permanent path a temporary object moves to when committed to an
    /// entity. `None` for paths that are already permanent.
    pub fn committed_to(&self, entity_type: EntityType, entity_id: &str) -> Option<StoragePath> {
        match self {
            StoragePath::Temporary { owner, suffix, .. } => Some(StoragePath::Permanent {
                owner: owner.clone(),
                entity_type,
                entity_id: entity_id.to_string(),
                suffix: suffix.clone(),
            }),
            _ => None,
        }
    }

    /// Whether this is a permanent image owned by the given entity.
    pub fn belongs_to(&self, entity_type: EntityType, entity_id: &str) -> bool {
        match self {
            StoragePath::Permanent {
                entity_type: t,
                entity_id: id,
                ..
            } => *t == entity_type && id == entity_id,
            _ => false,
        }
    }
}

impl Display for StoragePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.owner(), self.filename())
    }
}
