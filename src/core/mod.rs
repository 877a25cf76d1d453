//! # Core Module
//!
//! The I/O-free motion photo engine.
//!
//! ## Modules
//! - `media` - Media kinds, in-memory files, stored media records
//! - `detector` - Finds the embedded video boundary in a JPEG
//! - `segmenter` - Splits a motion photo into image and video
//! - `correlator` - Pairs images and videos by file name
//! - `resolver` - Decides which items of a collection are visible
//! - `linker` - Turns pair ids into saved links and keeps them across edits
//! - `pipeline` - Prepares an upload batch (split, then pair)

pub mod correlator;
pub mod detector;
pub mod linker;
pub mod media;
pub mod pipeline;
pub mod resolver;
pub mod segmenter;

// Re-export commonly used types
pub use correlator::{correlate, LivePhotoPair};
pub use detector::{detect, BoundaryDetector, BoundaryMatch, DetectorConfig};
pub use media::{MediaFile, MediaItem, MediaKind};
pub use resolver::{is_hidden, visible_items};
pub use segmenter::{segment, SegmentPair};
