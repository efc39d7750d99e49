//! Replay driver: reads tracked keypoints as JSON Lines, counts repetitions
//! per person, and writes one state line per frame.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::filter::LevelFilter;

use rep_tracker::config::Config;
use rep_tracker::frames::{self, FrameProcessor};

// ===========================================================================
// CLI
// ===========================================================================

#[derive(Parser, Debug)]
#[command(name = "rep_tracker", version = env!("GIT_VERSION"))]
#[command(about = "Per-person exercise classification and repetition counting")]
struct Args {
    /// Config file (defaults are used when it does not exist)
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Input JSON Lines file, `-` for stdin
    #[arg(long, default_value = "-")]
    input: String,

    /// Output JSON Lines file (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Override counter.down_angle
    #[arg(long)]
    down_angle: Option<f32>,

    /// Override counter.up_angle
    #[arg(long)]
    up_angle: Option<f32>,

    /// Override counter.torso_threshold
    #[arg(long)]
    torso_threshold: Option<f32>,

    /// error | warn | info | debug | trace
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Log a per-person summary line after every frame
    #[arg(long)]
    summary: bool,
}

impl Args {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(v) = self.down_angle {
            config.counter.down_angle = v;
        }
        if let Some(v) = self.up_angle {
            config.counter.up_angle = v;
        }
        if let Some(v) = self.torso_threshold {
            config.counter.torso_threshold = v;
        }
    }
}

// ===========================================================================
// Main
// ===========================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    info!(version = env!("GIT_VERSION"), "rep_tracker starting");

    let mut config = Config::load_or_default(&args.config)?;
    args.apply_overrides(&mut config);
    debug!(?config, "effective config");

    let mut processor =
        FrameProcessor::new(&config).context("invalid counter configuration")?;

    let reader: Box<dyn BufRead> = if args.input == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(&args.input)
            .with_context(|| format!("failed to open input {}", args.input))?;
        Box::new(BufReader::new(file))
    };

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let mut frames_in = 0u64;
    let mut rejected = 0u64;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.context("failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let record = match frames::parse_frame(&line) {
            Ok(record) => record,
            Err(e) => {
                warn!(line = line_no + 1, error = %format!("{:#}", e), "malformed frame skipped");
                rejected += 1;
                continue;
            }
        };
        frames_in += 1;

        let output = processor.process(&record);
        writeln!(writer, "{}", frames::encode_output(&output)?)?;

        if args.summary {
            for person in &output.people {
                info!("{}", person.summary_line());
            }
        }
    }
    writer.flush()?;

    info!(
        frames = frames_in,
        rejected,
        people = processor.registry().len(),
        "done"
    );
    for person in processor.registry().snapshots() {
        info!("{}", person.summary_line());
    }

    Ok(())
}
