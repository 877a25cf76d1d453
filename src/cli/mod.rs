//! # CLI Module
//!
//! Command-line interface for the motion photo kit.
//!
//! ## Usage
//! ```bash
//! # Report which files carry an embedded video
//! livephoto detect ~/Uploads
//!
//! # Split motion photos into image + video
//! livephoto split ~/Uploads --out-dir ~/Uploads/split
//!
//! # Pair separately exported images and videos by name
//! livephoto pair ~/Export --recursive --output json
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use motion_photo_kit::core::correlator::correlate;
use motion_photo_kit::core::detector::{BoundaryDetector, BoundaryMatch, DetectorConfig};
use motion_photo_kit::core::media::{extension_of, MediaKind};
use motion_photo_kit::core::pipeline::{PrepareResult, Preparer};
use motion_photo_kit::error::{OutputError, Result};
use motion_photo_kit::events::{Event, EventChannel, FileOutcome, FileReport, PrepareEvent};
use motion_photo_kit::io::{discover, screen, write_files, DiscoverConfig, PathSource};
use std::path::{Path, PathBuf};
use std::thread;

/// Motion photo kit - split motion photos and pair live photos
#[derive(Parser, Debug)]
#[command(name = "livephoto")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report the embedded video boundary of each file
    Detect {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        detector: DetectorArgs,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// Split motion photos into a still image and a video
    Split {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        detector: DetectorArgs,

        /// Directory the split halves are written to
        #[arg(long, required = true)]
        out_dir: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// Pair images and videos that share a base name
    Pair {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Files or directories to process
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Include hidden files
    #[arg(long)]
    include_hidden: bool,
}

impl InputArgs {
    /// Expand the paths, reporting unreadable ones on stderr
    fn files(&self, term: &Term) -> Vec<PathBuf> {
        let config = DiscoverConfig {
            recursive: self.recursive,
            include_hidden: self.include_hidden,
        };
        let result = discover(&self.paths, &config);
        for error in &result.errors {
            term.write_line(&format!("{} {}", style("!").yellow().bold(), error))
                .ok();
        }
        result.files
    }
}

#[derive(Args, Debug)]
struct DetectorArgs {
    /// Minimum file size in bytes for a file to carry a video
    #[arg(long, default_value_t = motion_photo_kit::core::detector::MIN_EMBEDDED_SIZE)]
    min_size: usize,

    /// Start of the search window, as a fraction of the file length
    #[arg(long, default_value_t = 0.05)]
    window_start: f64,

    /// End of the search window (exclusive), as a fraction of the file length
    #[arg(long, default_value_t = 0.80)]
    window_end: f64,
}

impl From<&DetectorArgs> for DetectorConfig {
    fn from(args: &DetectorArgs) -> Self {
        DetectorConfig::default()
            .min_size_bytes(args.min_size)
            .window_start(args.window_start)
            .window_end(args.window_end)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Detect {
            input,
            detector,
            output,
        } => run_detect(&input, (&detector).into(), output),
        Commands::Split {
            input,
            detector,
            out_dir,
            output,
        } => run_split(&input, (&detector).into(), &out_dir, output),
        Commands::Pair { input, output } => run_pair(&input, output),
    }
}

fn print_header(term: &Term, output: OutputFormat) {
    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Motion Photo Kit").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }
}

fn run_detect(input: &InputArgs, config: DetectorConfig, output: OutputFormat) -> Result<()> {
    config.validate()?;
    let term = Term::stderr();
    print_header(&term, output);

    let detector = BoundaryDetector::new(config);
    let results: Vec<(PathBuf, BoundaryMatch)> = input
        .files(&term)
        .into_iter()
        .map(|path| {
            let found = detector.detect_source(&PathSource::new(&path));
            (path, found)
        })
        .collect();

    match output {
        OutputFormat::Pretty => print_pretty_detect(&term, &results),
        OutputFormat::Json => print_json(&serde_json::json!({
            "files": results.iter().map(|(path, found)| {
                serde_json::json!({
                    "path": path,
                    "position": found.position,
                    "reason": found.reason,
                })
            }).collect::<Vec<_>>()
        }))?,
    }

    Ok(())
}

fn print_pretty_detect(term: &Term, results: &[(PathBuf, BoundaryMatch)]) {
    let mut embedded = 0;
    for (path, found) in results {
        match (found.position, found.reason) {
            (Some(position), _) => {
                embedded += 1;
                term.write_line(&format!(
                    "  {} {} video at offset {}",
                    style("●").green(),
                    path.display(),
                    style(position).cyan()
                ))
                .ok();
            }
            (None, reason) => {
                let reason = reason.map(|r| r.to_string()).unwrap_or_default();
                term.write_line(&format!(
                    "  {} {} {}",
                    style("○").dim(),
                    path.display(),
                    style(reason).dim()
                ))
                .ok();
            }
        }
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "{} {} of {} files carry an embedded video",
        style("✓").green().bold(),
        style(embedded).cyan(),
        results.len()
    ))
    .ok();
}

fn run_split(
    input: &InputArgs,
    config: DetectorConfig,
    out_dir: &Path,
    output: OutputFormat,
) -> Result<()> {
    let term = Term::stderr();
    print_header(&term, output);

    let preparer = Preparer::builder().detector(config).build()?;

    // Only motion photos are read in full; everything else is reported as kept
    let screened = screen(&input.files(&term), &BoundaryDetector::new(config));

    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output
    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        let template = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";
        if let Ok(bar_style) = ProgressStyle::default_bar().template(template) {
            pb.set_style(bar_style.progress_chars("█▓░"));
        }
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Prepare(PrepareEvent::Started { total_files }) => {
                    pb.set_length(total_files as u64);
                }
                Event::Prepare(PrepareEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                    pb.set_message(p.current_name);
                }
                Event::Prepare(PrepareEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = preparer.prepare_with_events(screened.embedded, &sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    let written = write_files(out_dir, &result.split_files())?;
    let kept = screened.kept;

    match output {
        OutputFormat::Pretty => print_pretty_split(&term, &result, &kept, out_dir, written.len()),
        OutputFormat::Json => print_json(&serde_json::json!({
            "summary": result.summary(),
            "files": result.reports.iter().chain(&kept).collect::<Vec<_>>(),
            "written": written,
            "pairs": result.pairs.iter().map(|pair| {
                serde_json::json!({
                    "image": result.files[pair.image_index].name,
                    "video": result.files[pair.video_index].name,
                    "pair_id": pair.pair_id,
                })
            }).collect::<Vec<_>>()
        }))?,
    }

    Ok(())
}

fn print_pretty_split(
    term: &Term,
    result: &PrepareResult,
    kept: &[FileReport],
    out_dir: &Path,
    written: usize,
) {
    for report in result.reports.iter().chain(kept) {
        let line = match &report.outcome {
            FileOutcome::Split {
                position,
                image_name,
                video_name,
            } => format!(
                "  {} {} -> {} + {} (at {})",
                style("✂").green(),
                report.name,
                style(image_name).cyan(),
                style(video_name).cyan(),
                position
            ),
            FileOutcome::Embedded { position } => format!(
                "  {} {} video at offset {}",
                style("●").green(),
                report.name,
                position
            ),
            FileOutcome::Kept { reason } => format!(
                "  {} {} {}",
                style("○").dim(),
                report.name,
                style(reason.map(|r| r.to_string()).unwrap_or_default()).dim()
            ),
            FileOutcome::SplitFailed { error } => format!(
                "  {} {} {}",
                style("!").yellow().bold(),
                report.name,
                style(error).yellow()
            ),
        };
        term.write_line(&line).ok();
    }

    term.write_line("").ok();
    term.write_line(&format!(
        "{} Split Complete",
        style("✓").green().bold()
    ))
    .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} files inspected in {:.1}s",
        style(result.reports.len() + kept.len()).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} motion photos split",
        style(result.split_count()).cyan()
    ))
    .ok();

    let bytes: u64 = result
        .split_files()
        .iter()
        .map(|f| f.len() as u64)
        .sum();
    term.write_line(&format!(
        "  {} files ({}) written to {}",
        style(written).cyan(),
        style(format_bytes(bytes)).yellow(),
        out_dir.display()
    ))
    .ok();
    term.write_line(&format!(
        "  {} live photo pairs",
        style(result.pairs.len()).cyan()
    ))
    .ok();
}

fn run_pair(input: &InputArgs, output: OutputFormat) -> Result<()> {
    let term = Term::stderr();
    print_header(&term, output);

    let paths = input.files(&term);
    let entries: Vec<(String, MediaKind)> = paths
        .iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_string_lossy().into_owned();
            let kind = extension_of(&name).and_then(MediaKind::from_extension)?;
            Some((path.display().to_string(), kind))
        })
        .collect();

    let pairs = correlate(&entries);

    match output {
        OutputFormat::Pretty => {
            for pair in &pairs {
                term.write_line(&format!(
                    "  {} {} + {}",
                    style("⇄").green(),
                    entries[pair.image_index].0,
                    entries[pair.video_index].0
                ))
                .ok();
            }
            if !pairs.is_empty() {
                term.write_line("").ok();
            }
            term.write_line(&format!(
                "{} {} live photo pairs among {} files",
                style("✓").green().bold(),
                style(pairs.len()).cyan(),
                entries.len()
            ))
            .ok();
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "files": entries.len(),
            "pairs": pairs.iter().map(|pair| {
                serde_json::json!({
                    "image": entries[pair.image_index].0,
                    "video": entries[pair.video_index].0,
                    "pair_id": pair.pair_id,
                })
            }).collect::<Vec<_>>()
        }))?,
    }

    Ok(())
}

fn print_json(value: &serde_json::Value) -> std::result::Result<(), OutputError> {
    let text =
        serde_json::to_string_pretty(value).map_err(|e| OutputError::Serialize(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
