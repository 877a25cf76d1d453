//! # livephoto CLI
//!
//! Command-line interface for the motion photo kit.
//!
//! ## Usage
//! ```bash
//! livephoto detect ~/Uploads/IMG_0042.jpg
//! livephoto split ~/Uploads --out-dir ./out --output json
//! livephoto pair ~/Uploads/IMG_0042.jpg ~/Uploads/IMG_0042.mov
//! ```

mod cli;

use motion_photo_kit::Result;

fn main() -> Result<()> {
    motion_photo_kit::init_tracing();
    cli::run()
}
