//! Data models for the image lifecycle
//!
//! Lifecycle state lives in the object store and is encoded in path strings;
//! these types give those strings a typed shape.

mod entity;
mod image;
mod storage_path;

pub use entity::*;
pub use image::*;
pub use storage_path::*;
