//! Expands command-line paths into media files using walkdir.

use crate::core::media::{extension_of, MediaKind};
use crate::error::ReadError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Configuration for path discovery
#[derive(Debug, Clone, Default)]
pub struct DiscoverConfig {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Include hidden files and directories
    pub include_hidden: bool,
}

/// Result of expanding paths
#[derive(Debug, Default)]
pub struct DiscoverResult {
    /// Image and video files, in walk order
    pub files: Vec<PathBuf>,
    /// Paths that could not be read (non-fatal)
    pub errors: Vec<ReadError>,
}

/// Accepts image and video files by extension
#[derive(Debug, Clone, Default)]
pub struct MediaFilter {
    include_hidden: bool,
}

impl MediaFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Check if a file should be included
    pub fn should_include(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if !self.include_hidden && name.starts_with('.') {
            return false;
        }
        extension_of(name).and_then(MediaKind::from_extension).is_some()
    }
}

/// Expand files and directories into the media files they contain.
///
/// Files named explicitly are kept even if their extension is unknown;
/// directory contents are filtered.
pub fn discover(paths: &[PathBuf], config: &DiscoverConfig) -> DiscoverResult {
    let filter = MediaFilter::new().with_hidden(config.include_hidden);
    let mut result = DiscoverResult::default();

    for root in paths {
        if root.is_file() {
            result.files.push(root.clone());
            continue;
        }

        let mut walker = WalkDir::new(root).sort_by_file_name();
        if !config.recursive {
            walker = walker.max_depth(1);
        }

        let include_hidden = config.include_hidden;
        let entries = walker.into_iter().filter_entry(|entry| {
            include_hidden
                || entry.depth() == 0
                || !entry.file_name().to_string_lossy().starts_with('.')
        });

        for entry in entries {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && filter.should_include(entry.path()) {
                        result.files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    let name = e
                        .path()
                        .unwrap_or(root.as_path())
                        .display()
                        .to_string();
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                    result.errors.push(ReadError::Io { name, source });
                }
            }
        }
    }

    result
}
