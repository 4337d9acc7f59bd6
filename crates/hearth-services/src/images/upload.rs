use bytes::Bytes;
use chrono::Utc;
use hearth_core::constants::{DEFAULT_UPLOAD_FOLDER, RANDOM_TOKEN_LEN};
use hearth_core::models::UploadResult;
use hearth_core::IdentityProvider;
use hearth_storage::paths::validate_path;
use hearth_storage::UploadOptions;
use rand::Rng;

use super::{ImageError, ImageLifecycle};

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const FALLBACK_EXTENSION: &str = "bin";

/// A file as received from the caller.
#[derive(Debug, Clone)]
pub struct ImageFile {
    /// Original filename; only its extension is kept.
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

impl ImageFile {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Extension of the original filename, else the MIME subtype, else `bin`.
    ///
    /// Always a single alphanumeric segment, so it cannot add a level to the path.
    pub fn extension(&self) -> String {
        let from_name = self.filename.rsplit_once('.').map(|(_, ext)| ext);
        let from_mime = self
            .content_type
            .split_once('/')
            // image/svg+xml -> svg
            .and_then(|(_, subtype)| subtype.split(['+', ';']).next())
            .map(str::trim);
        let ext = from_name
            .filter(|ext| is_plain_extension(ext))
            .or_else(|| from_mime.filter(|ext| is_plain_extension(ext)))
            .unwrap_or(FALLBACK_EXTENSION);
        ext.to_ascii_lowercase()
    }
}

fn is_plain_extension(ext: &str) -> bool {
    !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())
}

fn random_token() -> String {
    let mut rng = rand::rng();
    (0..RANDOM_TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

fn valid_folder(folder: &str) -> bool {
    !folder.is_empty() && !folder.contains('/') && validate_path(folder)
}

impl ImageLifecycle {
    /// Store a new image in the caller's folder as a temporary object.
    ///
    /// Authentication, MIME type, size and folder are checked in that order
    /// before anything is written.
    #[tracing::instrument(
        skip(self, file, identity),
        fields(content_type = %file.content_type, size_bytes = file.size())
    )]
    pub async fn upload_image(
        &self,
        file: ImageFile,
        identity: &dyn IdentityProvider,
        folder: Option<&str>,
    ) -> Result<UploadResult, ImageError> {
        let user = identity
            .current_user()
            .await
            .ok_or(ImageError::AuthenticationRequired)?;

        if !file.content_type.starts_with("image/") {
            return Err(ImageError::InvalidFileType(file.content_type));
        }

        let max = self.settings.max_file_size;
        if file.size() > max {
            return Err(ImageError::FileTooLarge {
                size: file.size(),
                max,
            });
        }

        let folder = folder.unwrap_or(DEFAULT_UPLOAD_FOLDER);
        if !valid_folder(folder) {
            return Err(ImageError::InvalidFolder(folder.to_string()));
        }

        let path = format!(
            "{}/{}-{}-{}.{}",
            user.id,
            folder,
            Utc::now().timestamp_millis(),
            random_token(),
            file.extension()
        );

        let options = UploadOptions::new(file.content_type.clone());
        let size = file.size();
        let stored = self
            .storage
            .upload(&path, file.data, &options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, path = %path, "Image upload failed");
                ImageError::UploadFailed(e)
            })?;

        let url = self.storage.public_url(&stored);
        tracing::info!(user_id = %user.id, path = %stored, size_bytes = size, "Image uploaded");

        Ok(UploadResult { url, path: stored })
    }
}
