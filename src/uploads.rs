use crate::error::ApiError;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Extensions accepted by the admin upload endpoint
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "apk", "json", "mp4", "webm"];

/// Maximum accepted upload size (100 MB)
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Checks the filename's extension against the allow-list (case-insensitive)
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Reduces a client-supplied filename to a safe single path component.
///
/// Drops directory components, replaces anything outside ASCII alphanumerics,
/// `.`, `-`, and `_` with underscores, and strips leading dots so the result
/// can never escape the upload directory or hide as a dotfile.
pub fn sanitize_filename(filename: &str) -> String {
    let basename = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let cleaned: String = basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    cleaned.trim_start_matches('.').to_string()
}

/// Validates that a requested filename is a plain, safe path component.
/// Used when serving uploads back out.
pub fn is_valid_path_component(component: &str) -> bool {
    !component.is_empty()
        && !component.starts_with('.')
        && !component.contains("..")
        && !component.contains('/')
        && !component.contains('\\')
}

/// Content type for a stored file, guessed from its extension
pub fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()) {
        Some(ext) => match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "apk" => "application/vnd.android.package-archive",
            "json" => "application/json",
            "mp4" => "video/mp4",
            "webm" => "video/webm",
            _ => "application/octet-stream",
        },
        None => "application/octet-stream",
    }
}

/// Outcome of a stored upload, echoed back to the admin client
#[derive(Debug, Serialize)]
pub struct StoredFile {
    pub filename: String,
    pub filepath: String,
    pub url: String,
    pub size: usize,
}

/// Validates and writes an uploaded file into the upload directory.
///
/// A name collision silently overwrites the existing file.
pub fn store_upload(dir: &Path, filename: &str, data: &[u8]) -> Result<StoredFile, ApiError> {
    if filename.is_empty() {
        return Err(ApiError::Validation("No selected file".to_string()));
    }
    if !allowed_file(filename) {
        return Err(ApiError::Validation("File type not allowed".to_string()));
    }
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::Validation("File exceeds maximum size".to_string()));
    }

    let safe_name = sanitize_filename(filename);
    if safe_name.is_empty() || !allowed_file(&safe_name) {
        return Err(ApiError::Validation("Invalid filename".to_string()));
    }

    fs::create_dir_all(dir).map_err(ApiError::internal)?;
    let path = dir.join(&safe_name);
    fs::write(&path, data).map_err(ApiError::internal)?;

    tracing::info!("Stored upload {} ({} bytes)", path.display(), data.len());

    Ok(StoredFile {
        url: format!("/api/files/{}", safe_name),
        filepath: path.to_string_lossy().to_string(),
        filename: safe_name,
        size: data.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_allowed_file() {
        assert!(allowed_file("icon.png"));
        assert!(allowed_file("movie.MP4"));
        assert!(allowed_file("bundle.Apk"));
        assert!(!allowed_file("script.sh"));
        assert!(!allowed_file("noextension"));
        assert!(!allowed_file("archive.tar.gz"));
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("/var/tmp/app.apk"), "app.apk");
        assert_eq!(sanitize_filename("C:\\temp\\icon.png"), "icon.png");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("my app (1).png"), "my_app__1_.png");
        assert_eq!(sanitize_filename("naïve.jpg"), "na_ve.jpg");
    }

    #[test]
    fn test_sanitize_strips_leading_dots() {
        assert_eq!(sanitize_filename(".hidden.png"), "hidden.png");
        assert_eq!(sanitize_filename("..."), "");
    }

    #[test]
    fn test_is_valid_path_component() {
        assert!(is_valid_path_component("app_1.apk"));
        assert!(is_valid_path_component("icon-2.png"));
        assert!(!is_valid_path_component(""));
        assert!(!is_valid_path_component(".hidden"));
        assert!(!is_valid_path_component("../data.json"));
        assert!(!is_valid_path_component("a/b.png"));
        assert!(!is_valid_path_component("a\\b.png"));
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("a.JPG"), "image/jpeg");
        assert_eq!(content_type_for("a.apk"), "application/vnd.android.package-archive");
        assert_eq!(content_type_for("a"), "application/octet-stream");
    }

    #[test]
    fn test_store_upload_writes_file() {
        let dir = tempdir().unwrap();
        let stored = store_upload(dir.path(), "my icon.png", b"fake png").unwrap();
        assert_eq!(stored.filename, "my_icon.png");
        assert_eq!(stored.url, "/api/files/my_icon.png");
        assert_eq!(stored.size, 8);
        assert_eq!(fs::read(dir.path().join("my_icon.png")).unwrap(), b"fake png");
    }

    #[test]
    fn test_store_upload_rejects_disallowed_extension() {
        let dir = tempdir().unwrap();
        let err = store_upload(dir.path(), "evil.exe", b"x").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_store_upload_rejects_oversize_payload() {
        let dir = tempdir().unwrap();
        let data = vec![0u8; MAX_UPLOAD_BYTES + 1];
        let err = store_upload(dir.path(), "big.apk", &data).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_store_upload_rejects_empty_name() {
        let dir = tempdir().unwrap();
        let err = store_upload(dir.path(), "", b"x").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_store_upload_overwrites_on_collision() {
        let dir = tempdir().unwrap();
        store_upload(dir.path(), "data.json", b"one").unwrap();
        store_upload(dir.path(), "data.json", b"two").unwrap();
        assert_eq!(fs::read(dir.path().join("data.json")).unwrap(), b"two");
    }
}
