//! # IO Module
//!
//! Filesystem adapters around the engine, used by the CLI.
//!
//! - `source` - [`PathSource`], a memory-mapped [`MediaSource`](crate::core::media::MediaSource)
//! - `discover` - Expands files and directories into media paths
//! - `screen` - Picks motion photos out of a set of paths
//! - `output` - Writes prepared files, keeping their modification time

mod discover;
mod output;
mod screen;
mod source;

pub use discover::{discover, DiscoverConfig, DiscoverResult, MediaFilter};
pub use output::write_files;
pub use screen::{screen, Screened};
pub use source::PathSource;
