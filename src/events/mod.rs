//! # Events Module
//!
//! Progress reporting for batch work.
//!
//! ## Design
//! The library emits events through channels so a CLI progress bar, a GUI
//! or a log sink can follow along without the core knowing which.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Prepare(PrepareEvent::Progress(p)) = event {
//!             println!("{}/{} {}", p.completed, p.total, p.current_name);
//!         }
//!     }
//! });
//!
//! let result = preparer.prepare_with_events(files, &sender);
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
