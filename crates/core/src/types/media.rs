//! Media attachments: images and short videos.

use serde::{Deserialize, Serialize};

/// Video container types accepted for upload.
pub const VIDEO_CONTENT_TYPES: &[&str] = &[
    "video/mp4",
    "video/webm",
    "video/ogg",
    "video/quicktime",
    "video/x-msvideo",
];

/// File extensions that mark an existing media URL as video.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "mov", "avi"];

/// Kind of an uploaded media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify an upload by its content type.
    ///
    /// Returns `None` for anything that is neither an image nor one of the
    /// accepted video containers.
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence.starts_with("image/") && essence.len() > "image/".len() {
            Some(Self::Image)
        } else if VIDEO_CONTENT_TYPES.contains(&essence.as_str()) {
            Some(Self::Video)
        } else {
            None
        }
    }
}

/// Whether a stored media URL points at a video, judged by its extension.
#[must_use]
pub fn is_video_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.rsplit_once('.').is_some_and(|(_, ext)| {
        VIDEO_EXTENSIONS
            .iter()
            .any(|video| video.eq_ignore_ascii_case(ext))
    })
}

/// Storage object name for an upload: a unique stem plus the original extension.
///
/// A name without a dot is used whole as the extension.
#[must_use]
pub fn storage_file_name(original: &str, unique: &str) -> String {
    let ext = original.rsplit('.').next().unwrap_or(original);
    format!("{unique}.{ext}")
}

/// A media item attached to a product, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Public URL of the file.
    pub url: String,
    /// Zero-based display position.
    pub position: i32,
    /// Whether the file is a video.
    pub is_video: bool,
}

impl MediaItem {
    /// Media item for an already stored URL, classified by extension.
    #[must_use]
    pub fn from_url(url: impl Into<String>, position: i32) -> Self {
        let url = url.into();
        let is_video = is_video_url(&url);
        Self {
            url,
            position,
            is_video,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_content_types() {
        assert_eq!(MediaKind::from_content_type("image/png"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_content_type("image/webp"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_content_type("video/mp4"), Some(MediaKind::Video));
        assert_eq!(
            MediaKind::from_content_type("video/quicktime; charset=binary"),
            Some(MediaKind::Video)
        );
        assert_eq!(MediaKind::from_content_type("video/x-matroska"), None);
        assert_eq!(MediaKind::from_content_type("application/pdf"), None);
        assert_eq!(MediaKind::from_content_type("image/"), None);
    }

    #[test]
    fn test_video_url_sniffing() {
        assert!(is_video_url("https://cdn.example.com/a/clip.MP4"));
        assert!(is_video_url("https://cdn.example.com/clip.mov?token=1"));
        assert!(!is_video_url("https://cdn.example.com/photo.jpg"));
        assert!(!is_video_url("https://cdn.example.com/mp4"));
    }

    #[test]
    fn test_storage_file_name_keeps_extension() {
        assert_eq!(storage_file_name("wig.front.jpg", "abc"), "abc.jpg");
        assert_eq!(storage_file_name("README", "abc"), "abc.README");
    }

    #[test]
    fn test_media_item_from_url() {
        let item = MediaItem::from_url("https://cdn.example.com/spin.webm", 2);
        assert!(item.is_video);
        assert_eq!(item.position, 2);
    }
}
