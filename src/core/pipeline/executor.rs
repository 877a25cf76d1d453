//! Upload preparation implementation.

use crate::core::correlator::{correlate_with, LivePhotoPair, PairIdGenerator, UuidGenerator};
use crate::core::detector::{BoundaryDetector, DetectorConfig};
use crate::core::media::MediaFile;
use crate::core::segmenter::split_file;
use crate::error::ConfigError;
use crate::events::{
    null_sender, Event, EventSender, FileOutcome, FileReport, PrepareEvent, PrepareProgress,
    PrepareSummary,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, warn};

/// Configuration for upload preparation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareConfig {
    /// Boundary detector settings
    pub detector: DetectorConfig,
    /// Replace embedded motion photos by their two halves
    pub split_embedded: bool,
    /// Pair images and videos by name after splitting
    pub correlate: bool,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            split_embedded: true,
            correlate: true,
        }
    }
}

/// Result of preparing a batch
#[derive(Debug)]
pub struct PrepareResult {
    /// Files to upload, in batch order, splits expanded in place
    pub files: Vec<MediaFile>,
    /// Live photo pairs, indices into `files`
    pub pairs: Vec<LivePhotoPair>,
    /// One report per input file, in input order
    pub reports: Vec<FileReport>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl PrepareResult {
    /// Number of motion photos that were split
    pub fn split_count(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_split()).count()
    }

    /// Number of input files passed through unchanged
    pub fn kept_count(&self) -> usize {
        self.reports.len() - self.split_count()
    }

    /// The image/video halves produced by splits, in batch order
    pub fn split_files(&self) -> Vec<&MediaFile> {
        let mut outputs = Vec::new();
        let mut cursor = 0;
        for report in &self.reports {
            if report.outcome.is_split() {
                outputs.extend(self.files[cursor..cursor + 2].iter());
                cursor += 2;
            } else {
                cursor += 1;
            }
        }
        outputs
    }

    pub fn summary(&self) -> PrepareSummary {
        PrepareSummary {
            input_files: self.reports.len(),
            output_files: self.files.len(),
            split_count: self.split_count(),
            pair_count: self.pairs.len(),
            duration_ms: self.duration_ms,
        }
    }
}

/// Builder for [`Preparer`]
pub struct PreparerBuilder {
    config: PrepareConfig,
    ids: Option<Box<dyn PairIdGenerator>>,
}

impl PreparerBuilder {
    pub fn new() -> Self {
        Self {
            config: PrepareConfig::default(),
            ids: None,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: PrepareConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the boundary detector configuration
    pub fn detector(mut self, detector: DetectorConfig) -> Self {
        self.config.detector = detector;
        self
    }

    /// Split embedded motion photos (default on)
    pub fn split_embedded(mut self, split: bool) -> Self {
        self.config.split_embedded = split;
        self
    }

    /// Pair by name after splitting (default on)
    pub fn correlate(mut self, correlate: bool) -> Self {
        self.config.correlate = correlate;
        self
    }

    /// Set where pair ids come from (random UUIDs by default)
    pub fn id_generator(mut self, ids: Box<dyn PairIdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Validate the configuration and build the preparer
    pub fn build(self) -> Result<Preparer, ConfigError> {
        self.config.detector.validate()?;
        Ok(Preparer {
            detector: BoundaryDetector::new(self.config.detector),
            config: self.config,
            ids: self.ids.unwrap_or_else(|| Box::new(UuidGenerator)),
        })
    }
}

impl Default for PreparerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits and pairs upload batches
pub struct Preparer {
    config: PrepareConfig,
    detector: BoundaryDetector,
    ids: Box<dyn PairIdGenerator>,
}

impl Preparer {
    pub fn builder() -> PreparerBuilder {
        PreparerBuilder::new()
    }

    pub fn config(&self) -> &PrepareConfig {
        &self.config
    }

    /// Prepare a batch without events
    pub fn prepare(&self, files: Vec<MediaFile>) -> PrepareResult {
        self.prepare_with_events(files, &null_sender())
    }

    /// Prepare a batch with event reporting
    pub fn prepare_with_events(
        &self,
        files: Vec<MediaFile>,
        events: &EventSender,
    ) -> PrepareResult {
        let start_time = Instant::now();
        let total = files.len();

        events.send(Event::Prepare(PrepareEvent::Started { total_files: total }));

        let completed = AtomicUsize::new(0);
        let processed: Vec<(Vec<MediaFile>, FileReport)> = files
            .into_par_iter()
            .map(|file| {
                let (outputs, report) = self.inspect(file);

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                events.send(Event::Prepare(PrepareEvent::Progress(PrepareProgress {
                    completed: done,
                    total,
                    current_name: report.name.clone(),
                })));
                events.send(Event::Prepare(PrepareEvent::FileProcessed(report.clone())));

                (outputs, report)
            })
            .collect();

        let mut files = Vec::with_capacity(total);
        let mut reports = Vec::with_capacity(total);
        for (outputs, report) in processed {
            files.extend(outputs);
            reports.push(report);
        }

        let pairs = if self.config.correlate {
            correlate_with(&files, &*self.ids)
        } else {
            Vec::new()
        };

        for pair in &pairs {
            events.send(Event::Prepare(PrepareEvent::Paired {
                image_name: files[pair.image_index].name.clone(),
                video_name: files[pair.video_index].name.clone(),
                pair_id: pair.pair_id.clone(),
            }));
        }

        let result = PrepareResult {
            files,
            pairs,
            reports,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        events.send(Event::Prepare(PrepareEvent::Completed {
            summary: result.summary(),
        }));

        result
    }

    /// Inspect one file; returns what to upload in its place
    fn inspect(&self, file: MediaFile) -> (Vec<MediaFile>, FileReport) {
        let found = self.detector.detect_file(&file);
        let name = file.name.clone();

        let Some(position) = found.position else {
            let outcome = FileOutcome::Kept {
                reason: found.reason,
            };
            return (vec![file], FileReport { name, outcome });
        };

        if !self.config.split_embedded {
            debug!(name = %name, position, "Motion photo left intact");
            let outcome = FileOutcome::Embedded { position };
            return (vec![file], FileReport { name, outcome });
        }

        match split_file(&file, position) {
            Ok(split) => {
                let outcome = FileOutcome::Split {
                    position,
                    image_name: split.image.name.clone(),
                    video_name: split.video.name.clone(),
                };
                (vec![split.image, split.video], FileReport { name, outcome })
            }
            Err(e) => {
                warn!(name = %name, error = %e, "Keeping motion photo unsplit");
                let outcome = FileOutcome::SplitFailed {
                    error: e.to_string(),
                };
                (vec![file], FileReport { name, outcome })
            }
        }
    }
}
