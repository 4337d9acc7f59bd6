//! Hearth image maintenance CLI.
//!
//! Reads the same environment as the services (`DATABASE_URL`, `STORAGE_*`,
//! `TEMP_IMAGE_MAX_AGE_HOURS`, ...). Results are printed as JSON on stdout;
//! logs go to stderr.

use anyhow::Context;
use clap::{Parser, Subcommand};
use hearth_cli::{
    build_lifecycle, init_tracing, print_json, OrphansOutput, PurgeOutput, TempCleanupOutput,
};
use hearth_core::{Config, EntityType};
use hearth_services::ImageCleanupService;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "hearth-images", about = "Hearth image storage maintenance")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete temporary uploads older than the given age
    CleanupTemp {
        /// Age threshold in hours (defaults to TEMP_IMAGE_MAX_AGE_HOURS)
        #[arg(long)]
        max_age_hours: Option<u32>,
    },
    /// Find permanent images whose entity no longer exists
    Orphans {
        /// Delete the orphans instead of only reporting them
        #[arg(long)]
        delete: bool,
    },
    /// Delete every image of a deleted entity
    PurgeEntity {
        /// Entity type: resource, event, community, user, shoutout
        entity_type: EntityType,
        /// Entity id
        entity_id: String,
    },
    /// Run the periodic cleanup until interrupted
    RunScheduler,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    let lifecycle = build_lifecycle(&config).await?;

    match cli.command {
        Commands::CleanupTemp { max_age_hours } => {
            let max_age_hours = max_age_hours.unwrap_or(config.temp_max_age_hours);
            let deleted = lifecycle.cleanup_temp_images(Some(max_age_hours)).await?;
            print_json(&TempCleanupOutput {
                max_age_hours,
                deleted,
            })?;
        }
        Commands::Orphans { delete } => {
            let orphans = lifecycle.find_orphaned_images(!delete).await?;
            print_json(&OrphansOutput::new(orphans, delete))?;
        }
        Commands::PurgeEntity {
            entity_type,
            entity_id,
        } => {
            let deleted = lifecycle
                .cleanup_entity_images(entity_type, &entity_id)
                .await?;
            print_json(&PurgeOutput {
                entity_type,
                entity_id,
                deleted,
            })?;
        }
        Commands::RunScheduler => {
            let service = Arc::new(ImageCleanupService::from_config(lifecycle, &config));
            let handle = service.start();
            tracing::info!(
                interval_secs = config.cleanup_interval_secs,
                "Image cleanup scheduler started"
            );

            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for shutdown signal")?;
            tracing::info!("Shutting down image cleanup scheduler");
            handle.abort();
        }
    }

    Ok(())
}
