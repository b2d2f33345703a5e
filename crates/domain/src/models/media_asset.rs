//! Uploaded media assets.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Public URL prefix under which uploads are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

#[derive(Debug, Clone, Serialize)]
pub struct MediaAsset {
    pub id: Uuid,
    pub file_name: String,
    pub url: String,
    pub alt_text: Option<String>,
    pub mime_type: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub category: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category for an accepted upload, or `None` for unsupported types.
pub fn media_category(mime_type: &str) -> Option<&'static str> {
    let mime = mime_type.trim().to_ascii_lowercase();
    if mime.starts_with("image/") {
        Some("image")
    } else if mime.starts_with("video/") {
        Some("video")
    } else {
        None
    }
}

/// Extension (with dot) taken from the client file name, `.bin` when absent.
pub fn upload_extension(original_name: &str) -> String {
    let base = original_name.rsplit(['/', '\\']).next().unwrap_or("");
    match base.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= 10
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{}", ext.to_ascii_lowercase())
        }
        _ => ".bin".to_string(),
    }
}

/// Stored file name: `<millis>-<suffix><ext>`.
pub fn stored_file_name(original_name: &str, millis: i64, suffix: u32) -> String {
    format!("{}-{}{}", millis, suffix, upload_extension(original_name))
}

pub fn public_url(file_name: &str) -> String {
    format!("{}/{}", UPLOADS_URL_PREFIX, file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_category() {
        assert_eq!(media_category("image/png"), Some("image"));
        assert_eq!(media_category("Video/MP4"), Some("video"));
        assert_eq!(media_category("application/pdf"), None);
        assert_eq!(media_category(""), None);
    }

    #[test]
    fn test_upload_extension() {
        assert_eq!(upload_extension("photo.JPG"), ".jpg");
        assert_eq!(upload_extension("archive.tar.gz"), ".gz");
        assert_eq!(upload_extension("README"), ".bin");
        assert_eq!(upload_extension(".hidden"), ".bin");
        assert_eq!(upload_extension("../../etc/passwd"), ".bin");
        assert_eq!(upload_extension("clip.mp4?x"), ".bin");
    }

    #[test]
    fn test_stored_file_name_and_url() {
        let name = stored_file_name("banner.webp", 1_733_000_000_000, 123_456_789);
        assert_eq!(name, "1733000000000-123456789.webp");
        assert_eq!(public_url(&name), "/uploads/1733000000000-123456789.webp");
    }
}
