//! Picks the motion photos out of a set of paths.
//!
//! Every path is searched through its memory-mapped [`PathSource`]; only
//! files that carry an embedded video are read onto the heap. The map of
//! each file is released as soon as its search is done.

use crate::core::detector::{BoundaryDetector, NotEmbeddedReason};
use crate::core::media::{MediaFile, MediaSource};
use crate::events::{FileOutcome, FileReport};
use crate::io::PathSource;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Paths sorted into motion photos and everything else
#[derive(Debug, Default)]
pub struct Screened {
    /// Motion photos, fully read, in input order
    pub embedded: Vec<MediaFile>,
    /// Files left untouched, in input order
    pub kept: Vec<FileReport>,
}

impl Screened {
    /// Number of paths screened
    pub fn len(&self) -> usize {
        self.embedded.len() + self.kept.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

enum Screening {
    Embedded(MediaFile),
    Kept(FileReport),
}

/// Search `paths` in parallel and read the motion photos among them
pub fn screen(paths: &[PathBuf], detector: &BoundaryDetector) -> Screened {
    let screenings: Vec<Screening> = paths
        .par_iter()
        .map(|path| screen_one(PathSource::new(path), detector))
        .collect();

    let mut screened = Screened::default();
    for screening in screenings {
        match screening {
            Screening::Embedded(file) => screened.embedded.push(file),
            Screening::Kept(report) => screened.kept.push(report),
        }
    }

    debug!(
        embedded = screened.embedded.len(),
        kept = screened.kept.len(),
        "Screened paths"
    );
    screened
}

fn screen_one(source: PathSource, detector: &BoundaryDetector) -> Screening {
    let name = source.name().to_string();
    let found = detector.detect_source(&source);

    if !found.is_found() {
        let outcome = FileOutcome::Kept {
            reason: found.reason,
        };
        return Screening::Kept(FileReport { name, outcome });
    }

    match source.read() {
        Ok(file) => Screening::Embedded(file),
        Err(e) => {
            warn!(error = %e, "Motion photo could not be read for splitting");
            let outcome = FileOutcome::Kept {
                reason: Some(NotEmbeddedReason::ReadFailed),
            };
            Screening::Kept(FileReport { name, outcome })
        }
    }
}
