//! Hearth Services Layer
//!
//! This crate is the **business service layer** for images: the lifecycle that
//! moves uploads from temporary to permanent storage and cleans up what is left
//! behind, plus the background scheduler that runs cleanup periodically. It
//! re-exports the storage and database types callers need to wire it up.

#[cfg(feature = "cleanup")]
pub mod cleanup;
pub mod images;

#[cfg(feature = "cleanup")]
pub use cleanup::{CleanupReport, ImageCleanupService};
pub use hearth_db::{EntityLookup, EntityRepository};
pub use hearth_storage::{create_storage, Storage, StorageBackend, StorageError, StorageResult};
pub use images::{ImageError, ImageFile, ImageLifecycle, ImageSettings};
