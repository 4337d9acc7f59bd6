//! Naming and sizing constants for stored images.

/// Marker that identifies a temporary upload in a filename.
pub const TEMP_MARKER: &str = "temp-upload-";

/// Default folder tag for uploads; combined with the timestamp it yields the
/// `temp-upload-{timestamp}-{random}.{ext}` filename.
pub const DEFAULT_UPLOAD_FOLDER: &str = "temp-upload";

/// Bucket all lifecycle operations run against unless configured otherwise.
pub const DEFAULT_BUCKET: &str = "images";

pub const DEFAULT_MAX_IMAGE_SIZE_BYTES: usize = 5 * 1024 * 1024;

pub const DEFAULT_TEMP_MAX_AGE_HOURS: u32 = 24;

/// Page size used when listing bucket folders.
pub const DEFAULT_LIST_PAGE_SIZE: usize = 1000;

/// Cache-Control max-age (seconds) sent with uploads.
pub const UPLOAD_CACHE_CONTROL: &str = "3600";

/// Length of the random token appended to upload filenames.
pub const RANDOM_TOKEN_LEN: usize = 8;
