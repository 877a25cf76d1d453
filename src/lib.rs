//! # Motion Photo Kit
//!
//! Splits vendor "motion photo" JPEGs (a still image with an MP4 stream
//! appended to the same file) and pairs separately uploaded image/video
//! halves into live photos.
//!
//! ## Architecture
//! The library is split into a pure engine and the adapters around it:
//! - `core` - Detection, segmentation, correlation and visibility rules
//! - `io` - File-backed sources, directory discovery, writing split outputs
//! - `events` - Event-driven progress reporting
//! - `error` - Error types
//!
//! The `core` modules never touch the filesystem or network. Callers hand
//! them bytes or batches of items and get results back.

pub mod core;
pub mod error;
pub mod events;
pub mod io;

// Re-export commonly used types at the crate root
pub use error::{MotionPhotoError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    // A subscriber may already be installed by an embedding application.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
