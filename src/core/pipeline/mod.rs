//! # Pipeline Module
//!
//! Prepares an upload batch: splits embedded motion photos, then pairs
//! images and videos by name.
//!
//! ## Flow
//! 1. Every file is inspected independently (in parallel). Embedded motion
//!    photos are replaced in place by their image and video halves; every
//!    other file, including ones that fail to split, passes through as-is.
//! 2. The resulting batch is correlated as a whole.
//!
//! Pairing looks at names only, not at which split produced a half. Two
//! motion photos with the same file name (e.g. from different folders)
//! yield two `IMG_1.jpg`/`IMG_1.mp4` pairs of halves; both images bind to
//! the first `IMG_1.mp4` and the second video stays unpaired.
//!
//! ## Example
//! ```rust,ignore
//! use motion_photo_kit::core::pipeline::Preparer;
//!
//! let preparer = Preparer::builder().build()?;
//! let result = preparer.prepare(files);
//! for pair in &result.pairs {
//!     let image = &result.files[pair.image_index];
//!     let video = &result.files[pair.video_index];
//!     println!("{} + {}", image.name, video.name);
//! }
//! ```

mod executor;

pub use executor::{PrepareConfig, PrepareResult, Preparer, PreparerBuilder};
