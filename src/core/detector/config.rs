//! Detector configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Smallest file that can carry a full still image plus a video (1 MiB)
pub const MIN_EMBEDDED_SIZE: usize = 1024 * 1024;

/// Configuration for the boundary detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Files smaller than this are never searched
    pub min_size_bytes: usize,
    /// Start of the search window as a fraction of the file length
    pub window_start: f64,
    /// End (exclusive) of the search window as a fraction of the file length
    pub window_end: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_size_bytes: MIN_EMBEDDED_SIZE,
            window_start: 0.05,
            window_end: 0.80,
        }
    }
}

impl DetectorConfig {
    pub fn min_size_bytes(mut self, min_size_bytes: usize) -> Self {
        self.min_size_bytes = min_size_bytes;
        self
    }

    pub fn window_start(mut self, fraction: f64) -> Self {
        self.window_start = fraction;
        self
    }

    pub fn window_end(mut self, fraction: f64) -> Self {
        self.window_end = fraction;
        self
    }

    /// Check that the window is a non-empty sub-range of `0.0..=1.0`
    pub fn validate(&self) -> Result<(), ConfigError> {
        for value in [self.window_start, self.window_end] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::FractionOutOfRange { value });
            }
        }
        if self.window_start >= self.window_end {
            return Err(ConfigError::EmptyWindow {
                start: self.window_start,
                end: self.window_end,
            });
        }
        Ok(())
    }

    /// Byte range searched in a buffer of `len` bytes
    pub fn window(&self, len: usize) -> Range<usize> {
        let start = fraction_of(len, self.window_start);
        let end = fraction_of(len, self.window_end);
        start..end.max(start)
    }
}

fn fraction_of(len: usize, fraction: f64) -> usize {
    let offset = (len as f64 * fraction.clamp(0.0, 1.0)).floor() as usize;
    offset.min(len)
}
