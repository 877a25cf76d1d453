//! Event type definitions for progress reporting.

use crate::core::detector::NotEmbeddedReason;
use serde::{Deserialize, Serialize};

/// All events emitted by the library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Upload preparation events
    Prepare(PrepareEvent),
}

/// Events while preparing an upload batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PrepareEvent {
    /// Preparation has started
    Started { total_files: usize },
    /// Progress update after each file
    Progress(PrepareProgress),
    /// A file was inspected (split or kept)
    FileProcessed(FileReport),
    /// An image and a video were paired by name
    Paired {
        image_name: String,
        video_name: String,
        pair_id: String,
    },
    /// Preparation completed
    Completed { summary: PrepareSummary },
}

/// Progress information during preparation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareProgress {
    /// Number of input files inspected so far
    pub completed: usize,
    /// Total number of input files
    pub total: usize,
    /// Name of the file just inspected
    pub current_name: String,
}

/// What happened to one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub name: String,
    pub outcome: FileOutcome,
}

/// Outcome of inspecting one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Replaced by a still image and a video
    Split {
        position: usize,
        image_name: String,
        video_name: String,
    },
    /// Contains a video but splitting is switched off
    Embedded { position: usize },
    /// No embedded video; uploaded as-is
    Kept { reason: Option<NotEmbeddedReason> },
    /// Boundary found but no valid split; uploaded as-is
    SplitFailed { error: String },
}

impl FileOutcome {
    pub fn is_split(&self) -> bool {
        matches!(self, FileOutcome::Split { .. })
    }
}

/// Summary of a preparation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareSummary {
    /// Files handed in
    pub input_files: usize,
    /// Files handed back (splits add one each)
    pub output_files: usize,
    /// Motion photos that were split
    pub split_count: usize,
    /// Live photo pairs found by name
    pub pair_count: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}
