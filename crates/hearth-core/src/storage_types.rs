use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage backend types
///
/// Defined in core because configuration selects it and every backend reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Local => write!(f, "local"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("S3".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert_eq!("Local".parse::<StorageBackend>().unwrap(), StorageBackend::Local);
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("nfs".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn display_matches_parse() {
        for backend in [StorageBackend::S3, StorageBackend::Local, StorageBackend::Memory] {
            assert_eq!(backend.to_string().parse::<StorageBackend>().unwrap(), backend);
        }
    }
}
