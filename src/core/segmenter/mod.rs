//! # Segmenter Module
//!
//! Splits a motion photo at a detected boundary into a standalone JPEG and
//! a standalone MP4.
//!
//! The split point sits [`BOX_HEADER_LEN`] bytes before the `ftyp` tag so
//! the video keeps its box length field. The two halves are disjoint and
//! concatenate back to the original buffer.

mod naming;

pub use naming::{image_name, strip_extension, video_name};

use crate::core::detector::BOX_HEADER_LEN;
use crate::core::media::{MediaFile, JPEG_MIME, MP4_MIME};
use crate::error::SegmentError;
use tracing::info;

/// The two halves of a split buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentPair {
    pub image_bytes: Vec<u8>,
    pub video_bytes: Vec<u8>,
}

impl SegmentPair {
    /// Total length of both halves
    pub fn len(&self) -> usize {
        self.image_bytes.len() + self.video_bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The two files produced from one motion photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitFiles {
    pub image: MediaFile,
    pub video: MediaFile,
}

/// Offset at which the video half starts for a tag found at `position`
pub fn split_point(len: usize, position: usize) -> Result<usize, SegmentError> {
    if position >= len {
        return Err(SegmentError::PositionOutOfBounds { position, len });
    }
    position
        .checked_sub(BOX_HEADER_LEN)
        .ok_or(SegmentError::SplitPointUnavailable {
            position,
            header_len: BOX_HEADER_LEN,
        })
}

/// Split a buffer at the boundary whose `ftyp` tag starts at `position`
pub fn segment(bytes: &[u8], position: usize) -> Result<SegmentPair, SegmentError> {
    let split = split_point(bytes.len(), position)?;
    let (image, video) = bytes.split_at(split);
    Ok(SegmentPair {
        image_bytes: image.to_vec(),
        video_bytes: video.to_vec(),
    })
}

/// Split an in-memory motion photo into named image and video files.
///
/// Both outputs keep the original modification time.
pub fn split_file(file: &MediaFile, position: usize) -> Result<SplitFiles, SegmentError> {
    let pair = segment(&file.bytes, position)?;

    info!(
        name = %file.name,
        image_len = pair.image_bytes.len(),
        video_len = pair.video_bytes.len(),
        "Split motion photo"
    );

    Ok(SplitFiles {
        image: MediaFile::new(image_name(&file.name), JPEG_MIME, pair.image_bytes)
            .with_modified(file.modified),
        video: MediaFile::new(video_name(&file.name), MP4_MIME, pair.video_bytes)
            .with_modified(file.modified),
    })
}
