//! # Detector Module
//!
//! Finds the boundary between the still image and the appended video
//! stream in a vendor motion photo.
//!
//! ## How it works
//! Motion photos from several Android vendors are a JPEG with an MP4
//! appended to the same byte stream. The MP4 opens with an ISO-BMFF
//! `ftyp` box: a 4-byte big-endian length followed by the ASCII tag
//! `ftyp`. The detector looks for that tag, but only:
//! - in JPEG-family files of at least 1 MiB,
//! - inside the window `[5%, 80%)` of the file,
//! - at offsets that leave room for the 4-byte length before the tag.
//!
//! ## Example
//! ```rust,ignore
//! use motion_photo_kit::core::detector::BoundaryDetector;
//!
//! let detector = BoundaryDetector::default();
//! let found = detector.detect_file(&file);
//! if let Some(position) = found.position {
//!     println!("video starts at {}", position - 4);
//! }
//! ```

mod config;

pub use config::{DetectorConfig, MIN_EMBEDDED_SIZE};

use crate::core::media::{declares_jpeg, MediaFile, MediaSource};
use memchr::memmem;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Tag that opens an ISO base media file (`ftyp` box type)
pub const FTYP_SIGNATURE: [u8; 4] = *b"ftyp";

/// Length of the box size field that precedes the `ftyp` tag
pub const BOX_HEADER_LEN: usize = 4;

/// Why a file was judged not to contain an embedded video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotEmbeddedReason {
    /// Declared type is not JPEG
    NotJpeg,
    /// Below the minimum size for a file carrying a video
    TooSmall,
    /// No qualifying `ftyp` tag inside the search window
    NoSignature,
    /// File contents could not be read
    ReadFailed,
}

impl fmt::Display for NotEmbeddedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotEmbeddedReason::NotJpeg => write!(f, "not a JPEG"),
            NotEmbeddedReason::TooSmall => write!(f, "too small"),
            NotEmbeddedReason::NoSignature => write!(f, "no video signature"),
            NotEmbeddedReason::ReadFailed => write!(f, "read failed"),
        }
    }
}

/// Result of a boundary search.
///
/// `position` is the offset of the first byte of the `ftyp` tag and is
/// always below the buffer length. When it is `None`, `reason` says why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryMatch {
    pub position: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<NotEmbeddedReason>,
}

impl BoundaryMatch {
    pub fn found(position: usize) -> Self {
        Self {
            position: Some(position),
            reason: None,
        }
    }

    pub fn not_found(reason: NotEmbeddedReason) -> Self {
        Self {
            position: None,
            reason: Some(reason),
        }
    }

    pub fn is_found(&self) -> bool {
        self.position.is_some()
    }
}

/// Scans buffers for the embedded video boundary.
///
/// Stateless apart from its configuration; share one instance across
/// threads freely.
#[derive(Clone)]
pub struct BoundaryDetector {
    config: DetectorConfig,
    finder: memmem::Finder<'static>,
}

impl BoundaryDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            finder: memmem::Finder::new(&FTYP_SIGNATURE),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Search a raw buffer for the boundary.
    ///
    /// No media type check is made here; see [`Self::detect_file`].
    pub fn detect(&self, bytes: &[u8]) -> BoundaryMatch {
        let len = bytes.len();
        if len < self.config.min_size_bytes {
            return BoundaryMatch::not_found(NotEmbeddedReason::TooSmall);
        }

        let window = self.config.window(len);
        if window.is_empty() {
            return BoundaryMatch::not_found(NotEmbeddedReason::NoSignature);
        }

        // Let the last tag that starts inside the window be matched in full.
        let haystack_end = (window.end + FTYP_SIGNATURE.len() - 1).min(len);
        let haystack = &bytes[window.start..haystack_end];

        for offset in self.finder.find_iter(haystack) {
            let position = window.start + offset;
            if position < BOX_HEADER_LEN {
                continue;
            }
            return BoundaryMatch::found(position);
        }

        BoundaryMatch::not_found(NotEmbeddedReason::NoSignature)
    }

    /// Detect within an in-memory file, applying the JPEG-family gate
    pub fn detect_file(&self, file: &MediaFile) -> BoundaryMatch {
        if !file.is_jpeg() {
            debug!(name = %file.name, mime = %file.mime, "Skipping non-JPEG file");
            return BoundaryMatch::not_found(NotEmbeddedReason::NotJpeg);
        }
        let result = self.detect(&file.bytes);
        debug!(name = %file.name, position = ?result.position, "Boundary search finished");
        result
    }

    /// Detect within any source.
    ///
    /// A read failure is logged and reported as not embedded so that the
    /// caller keeps the file as-is.
    pub fn detect_source(&self, source: &dyn MediaSource) -> BoundaryMatch {
        if !declares_jpeg(source.name(), source.mime()) {
            return BoundaryMatch::not_found(NotEmbeddedReason::NotJpeg);
        }

        let bytes = match source.load() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(name = %source.name(), error = %e, "Motion photo detection failed");
                return BoundaryMatch::not_found(NotEmbeddedReason::ReadFailed);
            }
        };

        let result = self.detect(&bytes);
        debug!(name = %source.name(), position = ?result.position, "Boundary search finished");
        result
    }
}

impl Default for BoundaryDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl fmt::Debug for BoundaryDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundaryDetector")
            .field("config", &self.config)
            .finish()
    }
}

/// Search a buffer with the default configuration
pub fn detect(bytes: &[u8]) -> BoundaryMatch {
    BoundaryDetector::default().detect(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::media::SourceBytes;
    use crate::error::ReadError;

    const MIB: usize = 1024 * 1024;

    fn buffer_with_tag_at(len: usize, position: usize) -> Vec<u8> {
        let mut bytes = vec![0xAB; len];
        bytes[position..position + 4].copy_from_slice(&FTYP_SIGNATURE);
        bytes
    }

    #[test]
    fn rejects_buffers_below_minimum_size() {
        let bytes = buffer_with_tag_at(MIB - 1, MIB / 2);
        let result = detect(&bytes);
        assert!(!result.is_found());
        assert_eq!(result.reason, Some(NotEmbeddedReason::TooSmall));
    }

    #[test]
    fn detects_at_exact_minimum_size() {
        let len = MIN_EMBEDDED_SIZE;
        let bytes = buffer_with_tag_at(len, len / 2);
        assert_eq!(detect(&bytes).position, Some(len / 2));
    }

    #[test]
    fn finds_tag_in_middle_of_window() {
        let len = 2 * MIB;
        let bytes = buffer_with_tag_at(len, len / 2);
        assert_eq!(detect(&bytes).position, Some(len / 2));
    }

    #[test]
    fn ignores_tag_past_window_end() {
        let len = 2 * MIB;
        let position = len * 9 / 10;
        let bytes = buffer_with_tag_at(len, position);
        let result = detect(&bytes);
        assert!(!result.is_found());
        assert_eq!(result.reason, Some(NotEmbeddedReason::NoSignature));
    }

    #[test]
    fn ignores_tag_before_window_start() {
        let len = 2 * MIB;
        let bytes = buffer_with_tag_at(len, 100);
        assert!(!detect(&bytes).is_found());
    }

    #[test]
    fn window_is_half_open() {
        let len = 2 * MIB;
        let config = DetectorConfig::default();
        let window = config.window(len);

        let last_inside = buffer_with_tag_at(len, window.end - 1);
        assert_eq!(detect(&last_inside).position, Some(window.end - 1));

        let at_end = buffer_with_tag_at(len, window.end);
        assert!(!detect(&at_end).is_found());

        let at_start = buffer_with_tag_at(len, window.start);
        assert_eq!(detect(&at_start).position, Some(window.start));
    }

    #[test]
    fn reports_first_qualifying_tag() {
        let len = 2 * MIB;
        let mut bytes = buffer_with_tag_at(len, len / 4);
        bytes[len / 2..len / 2 + 4].copy_from_slice(&FTYP_SIGNATURE);
        assert_eq!(detect(&bytes).position, Some(len / 4));
    }

    #[test]
    fn skips_tags_without_room_for_box_header() {
        let detector = BoundaryDetector::new(DetectorConfig {
            min_size_bytes: 0,
            window_start: 0.0,
            window_end: 0.8,
        });
        let mut bytes = vec![0u8; 100];
        bytes[1..5].copy_from_slice(&FTYP_SIGNATURE);
        bytes[40..44].copy_from_slice(&FTYP_SIGNATURE);
        assert_eq!(detector.detect(&bytes).position, Some(40));
    }

    #[test]
    fn detect_file_requires_jpeg() {
        let len = 2 * MIB;
        let bytes = buffer_with_tag_at(len, len / 2);
        let detector = BoundaryDetector::default();

        let png = MediaFile::new("x.png", "image/png", bytes.clone());
        assert_eq!(
            detector.detect_file(&png).reason,
            Some(NotEmbeddedReason::NotJpeg)
        );

        let jpeg = MediaFile::new("x.jpg", "image/jpeg", bytes);
        assert!(detector.detect_file(&jpeg).is_found());
    }

    struct BrokenSource;

    impl MediaSource for BrokenSource {
        fn name(&self) -> &str {
            "broken.jpg"
        }

        fn mime(&self) -> &str {
            "image/jpeg"
        }

        fn load(&self) -> Result<SourceBytes<'_>, ReadError> {
            Err(ReadError::Io {
                name: "broken.jpg".to_string(),
                source: std::io::Error::other("device unplugged"),
            })
        }
    }

    #[test]
    fn read_failure_degrades_to_not_embedded() {
        let result = BoundaryDetector::default().detect_source(&BrokenSource);
        assert!(!result.is_found());
        assert_eq!(result.reason, Some(NotEmbeddedReason::ReadFailed));
    }

    #[test]
    fn boundary_match_serializes_without_reason_when_found() {
        let json = serde_json::to_string(&BoundaryMatch::found(42)).unwrap();
        assert_eq!(json, r#"{"position":42}"#);

        let json =
            serde_json::to_string(&BoundaryMatch::not_found(NotEmbeddedReason::TooSmall)).unwrap();
        assert!(json.contains("too_small"));
    }
}
