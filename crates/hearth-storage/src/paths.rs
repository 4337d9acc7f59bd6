//! Translation between public URLs and bucket-relative paths.
//!
//! URL format: `{base_url}/{bucket}/{path}`, each path segment percent-encoded.

use url::Url;

/// Build the public URL for a path.
pub fn public_url(base_url: &str, bucket: &str, path: &str) -> String {
    let encoded: Vec<String> = path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        bucket,
        encoded.join("/")
    )
}

/// Recover the bucket-relative path from a public URL.
///
/// Everything after the first path segment equal to `bucket` is the path.
/// Returns `None` when the URL cannot be parsed, has no such segment, or has
/// nothing (or an empty segment) after it.
pub fn extract_path(url: &str, bucket: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed.path_segments()?.collect();
    let start = segments.iter().position(|segment| *segment == bucket)? + 1;
    let rest = &segments[start..];
    if rest.is_empty() || rest.iter().any(|segment| segment.is_empty()) {
        return None;
    }

    let decoded = rest
        .iter()
        .map(|segment| urlencoding::decode(segment).ok().map(|s| s.into_owned()))
        .collect::<Option<Vec<String>>>()?;
    Some(decoded.join("/"))
}

/// Reject paths that could escape the bucket or address nothing.
pub fn validate_path(path: &str) -> bool {
    !path.is_empty()
        && !path.starts_with('/')
        && !path.contains('\\')
        && path.split('/').all(|segment| !segment.is_empty() && segment != "..")
}
