//! # Error Module
//!
//! Error types for the motion photo kit.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - file names, offsets, what went wrong
//! - **Degrade, don't abort** - read and split failures leave the original
//!   file untouched; callers keep uploading it as-is
//!
//! "Not embedded" is not an error. It is a normal detection result, see
//! [`crate::core::detector::BoundaryMatch`].

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum MotionPhotoError {
    #[error("Read error: {0}")]
    Read(#[from] ReadError),

    #[error("Segmentation error: {0}")]
    Segment(#[from] SegmentError),

    #[error("Linking error: {0}")]
    Link(#[from] LinkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

/// Failure to obtain the contents of a file
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File is empty: {name}")]
    Empty { name: String },
}

/// No valid split point for a buffer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmentError {
    #[error("No room for a {header_len}-byte box header before offset {position}")]
    SplitPointUnavailable { position: usize, header_len: usize },

    #[error("Boundary offset {position} is outside a {len}-byte buffer")]
    PositionOutOfBounds { position: usize, len: usize },
}

/// Errors while turning pair ids into persisted links
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("Got {pair_ids} pair ids for {media} media items")]
    LengthMismatch { media: usize, pair_ids: usize },
}

/// Invalid detector or pipeline settings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Search window fraction {value} must be within 0.0..=1.0")]
    FractionOutOfRange { value: f64 },

    #[error("Search window start {start} must be below its end {end}")]
    EmptyWindow { start: f64, end: f64 },
}

/// Errors while writing split files to disk
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Output directory not usable: {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Refusing to overwrite {path}")]
    Collision { path: PathBuf },

    #[error("Failed to serialize output: {0}")]
    Serialize(String),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, MotionPhotoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_includes_name() {
        let error = ReadError::Io {
            name: "IMG_0042.jpg".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let message = error.to_string();
        assert!(message.contains("IMG_0042.jpg"));
        assert!(message.contains("gone"));
    }

    #[test]
    fn segment_error_includes_offsets() {
        let error = SegmentError::SplitPointUnavailable {
            position: 2,
            header_len: 4,
        };
        let message = error.to_string();
        assert!(message.contains('2'));
        assert!(message.contains("4-byte"));
    }

    #[test]
    fn errors_convert_into_top_level() {
        let error: MotionPhotoError = LinkError::LengthMismatch {
            media: 3,
            pair_ids: 2,
        }
        .into();
        assert!(matches!(error, MotionPhotoError::Link(_)));
        assert!(error.to_string().contains("3 media"));
    }
}
