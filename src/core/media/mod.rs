//! # Media Module
//!
//! Shared vocabulary for the engine: media kinds, mime classification,
//! in-memory files and the [`MediaSource`] seam that hands bytes to the
//! detector.

mod item;
mod source;

pub use item::MediaItem;
pub use source::{MediaSource, SourceBytes};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mime type written for the still half of a split motion photo
pub const JPEG_MIME: &str = "image/jpeg";
/// Mime type written for the video half of a split motion photo
pub const MP4_MIME: &str = "video/mp4";

/// Whether a media item is a still image or a video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify by mime type prefix (`image/...`, `video/...`)
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim().to_ascii_lowercase();
        if mime.starts_with("image/") {
            Some(MediaKind::Image)
        } else if mime.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    /// Classify by file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::from_mime(mime_from_extension(ext))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check whether a declared mime type is in the JPEG family.
///
/// Parameters after `;` are ignored.
pub fn is_jpeg_mime(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    matches!(essence.as_str(), "image/jpeg" | "image/jpg" | "image/pjpeg")
}

/// Check whether a file extension is in the JPEG family
pub fn is_jpeg_extension(ext: &str) -> bool {
    matches!(
        ext.to_ascii_lowercase().as_str(),
        "jpg" | "jpeg" | "jpe" | "jfif"
    )
}

/// JPEG family by mime type, or by the name's extension when no mime type
/// was declared
pub fn declares_jpeg(name: &str, mime: &str) -> bool {
    if mime.trim().is_empty() {
        extension_of(name).is_some_and(is_jpeg_extension)
    } else {
        is_jpeg_mime(mime)
    }
}

/// Best-effort mime type for a file extension
pub fn mime_from_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" | "jpe" | "jfif" => JPEG_MIME,
        "png" => "image/png",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "mp4" => MP4_MIME,
        "mov" | "qt" => "video/quicktime",
        "m4v" => "video/x-m4v",
        "webm" => "video/webm",
        "3gp" => "video/3gpp",
        _ => "application/octet-stream",
    }
}

/// Extension of a file name (text after the last dot), if any
pub fn extension_of(name: &str) -> Option<&str> {
    let file = name.rsplit(['/', '\\']).next().unwrap_or(name);
    file.rfind('.')
        .map(|idx| &file[idx + 1..])
        .filter(|ext| !ext.is_empty())
}

/// One uploaded file held in memory.
///
/// The name and mime type are whatever the caller declared; the engine
/// never sniffs content to override them.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// File name as supplied by the uploader
    pub name: String,
    /// Declared mime type (may be empty)
    pub mime: String,
    /// Last modification time, preserved across splits
    pub modified: DateTime<Utc>,
    /// Full file contents
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            modified: Utc::now(),
            bytes,
        }
    }

    /// Build a file whose mime type is inferred from its extension
    pub fn from_name(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = extension_of(&name).map(mime_from_extension).unwrap_or("");
        Self::new(name, mime, bytes)
    }

    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = modified;
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Image or video, judged by the declared mime type
    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::from_mime(&self.mime)
    }

    /// JPEG family by mime type, or by extension when no mime type was declared
    pub fn is_jpeg(&self) -> bool {
        declares_jpeg(&self.name, &self.mime)
    }
}

impl fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("modified", &self.modified)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_mime_wins_over_extension() {
        assert!(declares_jpeg("IMG_1.png", "image/jpeg"));
        assert!(!declares_jpeg("IMG_1.jpg", "image/png"));
        assert!(declares_jpeg("IMG_1.JPEG", ""));
        assert!(!declares_jpeg("IMG_1", " "));
    }

    #[test]
    fn kind_from_mime_prefix() {
        assert_eq!(MediaKind::from_mime("image/jpeg"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_mime("Video/QuickTime"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_mime("application/pdf"), None);
        assert_eq!(MediaKind::from_mime(""), None);
    }

    #[test]
    fn jpeg_family_mimes() {
        assert!(is_jpeg_mime("image/jpeg"));
        assert!(is_jpeg_mime("IMAGE/JPG"));
        assert!(is_jpeg_mime("image/jpeg; charset=binary"));
        assert!(!is_jpeg_mime("image/png"));
        assert!(!is_jpeg_mime("image/heic"));
    }

    #[test]
    fn extension_of_handles_paths_and_dotless_names() {
        assert_eq!(extension_of("a/b/IMG_1.JPG"), Some("JPG"));
        assert_eq!(extension_of("C:\\photos\\x.mov"), Some("mov"));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn empty_mime_falls_back_to_extension() {
        let file = MediaFile::new("MVIMG_2024.jpg", "", vec![0; 4]);
        assert!(file.is_jpeg());

        let file = MediaFile::new("MVIMG_2024.jpg", "image/png", vec![0; 4]);
        assert!(!file.is_jpeg());
    }

    #[test]
    fn from_name_infers_mime() {
        let file = MediaFile::from_name("clip.MOV", Vec::new());
        assert_eq!(file.mime, "video/quicktime");
        assert_eq!(file.kind(), Some(MediaKind::Video));
    }

    #[test]
    fn debug_omits_contents() {
        let file = MediaFile::new("a.jpg", JPEG_MIME, vec![7; 3]);
        let debug = format!("{:?}", file);
        assert!(debug.contains("len: 3"));
    }
}
