//! Hearth Database Library
//!
//! Database access for the image lifecycle. The schema and its policies belong
//! to the hosted platform; this crate only reads from it.

pub mod db;

pub use db::{create_pool, EntityLookup, EntityRepository};
