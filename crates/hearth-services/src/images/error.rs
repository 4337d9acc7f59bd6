use hearth_storage::StorageError;
use thiserror::Error;

/// Errors from the image lifecycle.
///
/// Validation and authentication errors are raised before any I/O. The I/O
/// variants keep the storage error as their source. Nothing here is retried
/// automatically.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Authentication required to upload images")]
    AuthenticationRequired,

    #[error("Invalid file type: {0}. Only images are allowed")]
    InvalidFileType(String),

    #[error("File too large: {size} bytes exceeds the {max} byte limit")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid upload folder: {0}")]
    InvalidFolder(String),

    #[error("Invalid entity id: {0:?}")]
    InvalidEntityId(String),

    #[error("Failed to upload image: {0}")]
    UploadFailed(#[source] StorageError),

    #[error("Failed to commit image {path}: {source}")]
    CommitFailed {
        path: String,
        #[source]
        source: StorageError,
    },

    #[error("Failed to delete images: {0}")]
    DeletionFailed(#[source] StorageError),

    #[error("Failed to list images: {0}")]
    ListingFailed(#[source] StorageError),
}

impl ImageError {
    /// Machine-readable error code (e.g., "COMMIT_FAILED")
    pub fn error_code(&self) -> &'static str {
        match self {
            ImageError::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            ImageError::InvalidFileType(_) => "INVALID_FILE_TYPE",
            ImageError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            ImageError::InvalidFolder(_) => "INVALID_FOLDER",
            ImageError::InvalidEntityId(_) => "INVALID_ENTITY_ID",
            ImageError::UploadFailed(_) => "UPLOAD_FAILED",
            ImageError::CommitFailed { .. } => "COMMIT_FAILED",
            ImageError::DeletionFailed(_) => "DELETION_FAILED",
            ImageError::ListingFailed(_) => "LISTING_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn commit_failed_message_names_path_and_cause() {
        let err = ImageError::CommitFailed {
            path: "u1/temp-upload-111-abc.jpg".to_string(),
            source: StorageError::NotFound("u1/temp-upload-111-abc.jpg".to_string()),
        };
        assert!(err
            .to_string()
            .starts_with("Failed to commit image u1/temp-upload-111-abc.jpg: File not found"));
        assert!(err.source().is_some());
    }

    #[test]
    fn validation_errors_have_codes() {
        assert_eq!(
            ImageError::AuthenticationRequired.error_code(),
            "AUTHENTICATION_REQUIRED"
        );
        assert_eq!(
            ImageError::FileTooLarge { size: 2, max: 1 }.error_code(),
            "FILE_TOO_LARGE"
        );
        assert_eq!(
            ImageError::InvalidFileType("text/plain".into()).error_code(),
            "INVALID_FILE_TYPE"
        );
    }
}
