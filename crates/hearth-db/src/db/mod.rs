//! Database repositories for data access layer
//!
//! Repositories are read-only views over tables owned by the hosted platform.
//
// Connection pool setup
pub mod pool;
//
// Entity existence lookups (orphan detection)
pub mod entity;

pub use entity::{EntityLookup, EntityRepository};
pub use pool::create_pool;
