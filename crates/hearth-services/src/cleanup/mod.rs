mod service;

pub use service::{CleanupReport, ImageCleanupService};
