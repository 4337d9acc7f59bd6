//! Configuration module
//!
//! Settings for the image lifecycle: storage backend and bucket, database
//! connection, upload limits and cleanup scheduling. Values come from the
//! environment (a `.env` file is loaded first when present).

use std::env;

use crate::constants::{
    DEFAULT_BUCKET, DEFAULT_LIST_PAGE_SIZE, DEFAULT_MAX_IMAGE_SIZE_BYTES,
    DEFAULT_TEMP_MAX_AGE_HOURS,
};
use crate::storage_types::StorageBackend;

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const CLEANUP_INTERVAL_SECS: u64 = 3600;

#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub storage_bucket: String,
    /// Base URL public object URLs are built from (the bucket name is appended).
    pub storage_public_url: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, Supabase, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub list_page_size: usize,
    // Image lifecycle
    pub max_image_size_bytes: usize,
    pub temp_max_age_hours: u32,
    pub cleanup_interval_secs: u64,
    pub cleanup_orphan_scan: bool,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let storage_backend = match env_opt("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::Local,
        };

        let max_image_size_bytes = match env_opt("IMAGE_MAX_SIZE_MB") {
            Some(mb) => {
                mb.trim()
                    .parse::<usize>()
                    .map_err(|_| anyhow::anyhow!("IMAGE_MAX_SIZE_MB must be a valid number"))?
                    * 1024
                    * 1024
            }
            None => DEFAULT_MAX_IMAGE_SIZE_BYTES,
        };

        let config = Config {
            environment,
            database_url: env::var("DATABASE_URL").unwrap_or_default(),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: env_or("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            storage_backend,
            storage_bucket: env_opt("STORAGE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            storage_public_url: env_opt("STORAGE_PUBLIC_URL"),
            s3_region: env_opt("S3_REGION"),
            s3_endpoint: env_opt("S3_ENDPOINT"),
            aws_region: env_opt("AWS_REGION"),
            local_storage_path: env_opt("LOCAL_STORAGE_PATH"),
            list_page_size: env_or("STORAGE_LIST_PAGE_SIZE", DEFAULT_LIST_PAGE_SIZE),
            max_image_size_bytes,
            temp_max_age_hours: env_or("TEMP_IMAGE_MAX_AGE_HOURS", DEFAULT_TEMP_MAX_AGE_HOURS),
            cleanup_interval_secs: env_or("CLEANUP_INTERVAL_SECS", CLEANUP_INTERVAL_SECS),
            cleanup_orphan_scan: env_bool("CLEANUP_ORPHAN_SCAN", false),
        };

        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.storage_bucket.trim().is_empty() || self.storage_bucket.contains('/') {
            return Err(anyhow::anyhow!(
                "STORAGE_BUCKET must be a single non-empty path segment"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "STORAGE_BACKEND=s3 requires S3_REGION or AWS_REGION to be set"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "STORAGE_BACKEND=local requires LOCAL_STORAGE_PATH to be set"
                    ));
                }
                if self.storage_public_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "STORAGE_BACKEND=local requires STORAGE_PUBLIC_URL to be set"
                    ));
                }
            }
            StorageBackend::Memory => {
                if self.is_production() {
                    return Err(anyhow::anyhow!(
                        "STORAGE_BACKEND=memory cannot be used in production"
                    ));
                }
            }
        }

        if !self.database_url.is_empty()
            && !(self.database_url.starts_with("postgres://")
                || self.database_url.starts_with("postgresql://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.max_image_size_bytes == 0 {
            return Err(anyhow::anyhow!("IMAGE_MAX_SIZE_MB must be greater than 0"));
        }

        if self.list_page_size == 0 {
            return Err(anyhow::anyhow!("STORAGE_LIST_PAGE_SIZE must be greater than 0"));
        }

        if self.cleanup_interval_secs == 0 {
            return Err(anyhow::anyhow!("CLEANUP_INTERVAL_SECS must be greater than 0"));
        }

        Ok(())
    }

    /// Region for the S3 backend, falling back to the general AWS region.
    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref().or(self.aws_region.as_deref())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            environment: "development".to_string(),
            database_url: String::new(),
            db_max_connections: MAX_CONNECTIONS,
            db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
            storage_backend: StorageBackend::Memory,
            storage_bucket: DEFAULT_BUCKET.to_string(),
            storage_public_url: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: None,
            list_page_size: DEFAULT_LIST_PAGE_SIZE,
            max_image_size_bytes: DEFAULT_MAX_IMAGE_SIZE_BYTES,
            temp_max_age_hours: DEFAULT_TEMP_MAX_AGE_HOURS,
            cleanup_interval_secs: CLEANUP_INTERVAL_SECS,
            cleanup_orphan_scan: false,
        }
    }
}
