use anyhow::Context;
use hearth_core::{Config, EntityType};
use hearth_db::{create_pool, EntityRepository};
use hearth_services::{create_storage, ImageLifecycle, ImageSettings};
use serde::Serialize;
use std::sync::Arc;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Wire storage and database from configuration.
pub async fn build_lifecycle(config: &Config) -> anyhow::Result<ImageLifecycle> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage")?;
    let pool = create_pool(config)
        .await
        .context("Failed to connect to database")?;

    Ok(ImageLifecycle::new(
        storage,
        Arc::new(EntityRepository::new(pool)),
        ImageSettings::from_config(config),
    ))
}

#[derive(Debug, Serialize)]
pub struct TempCleanupOutput {
    pub max_age_hours: u32,
    pub deleted: usize,
}

#[derive(Debug, Serialize)]
pub struct OrphansOutput {
    pub count: usize,
    pub deleted: bool,
    pub orphans: Vec<String>,
}

impl OrphansOutput {
    pub fn new(orphans: Vec<String>, deleted: bool) -> Self {
        Self {
            count: orphans.len(),
            deleted,
            orphans,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PurgeOutput {
    pub entity_type: EntityType,
    pub entity_id: String,
    pub deleted: usize,
}

/// Pretty JSON on stdout.
pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn orphans_output_counts_paths() {
        let output = OrphansOutput::new(vec!["u1/resource-r9-1-a.jpg".to_string()], false);
        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            json!({
                "count": 1,
                "deleted": false,
                "orphans": ["u1/resource-r9-1-a.jpg"],
            })
        );
    }

    #[test]
    fn purge_output_uses_lowercase_entity_type() {
        let output = PurgeOutput {
            entity_type: EntityType::Community,
            entity_id: "c1".to_string(),
            deleted: 4,
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["entity_type"], "community");
        assert_eq!(value["deleted"], 4);
    }
}
