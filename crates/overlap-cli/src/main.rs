//! `overlap` CLI — compute common free time blocks for groups of participants.
//!
//! ## Usage
//!
//! ```sh
//! # Solve a batch request (stdin → stdout)
//! cat request.json | overlap solve
//!
//! # Solve from file to file with hourly blocks
//! overlap solve -i request.json -o response.json --block-minutes 60
//!
//! # Settings from a TOML file, flags override it
//! overlap --config overlap.toml solve -i request.json --min-duration 60
//!
//! # Inspect merged runs before they are cut into blocks
//! overlap runs -i request.json --pretty
//!
//! # Cut a list of {start, end} slots into 30-minute blocks
//! overlap split -i slots.json --block-minutes 30
//! ```
//!
//! A request looks like
//! `{"groups": [["123", "456"]], "availability": {"123": [{"start": ..., "end": ...}]}}`.
//! The response is printed even when the batch fails; the exit status is 1
//! for an `"error"` response.

mod settings;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use overlap_engine::{
    parse_request, split_into_blocks, BatchResponse, EngineConfig, SchedulingEngine, TimeRange,
};
use settings::{init_tracing, Settings};
use std::io::{self, Read};
use std::process;

#[derive(Parser)]
#[command(
    name = "overlap",
    version,
    about = "Common free time blocks for groups of participants"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML settings file with [engine] and [logging] sections
    #[arg(long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Logs go to stderr.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute fixed-size common free blocks for every group
    Solve {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Show merged common free runs per group, before block splitting
    Runs {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Cut a JSON list of {start, end} slots into fixed-size blocks
    Split {
        #[command(flatten)]
        io: IoArgs,
        /// Block size in minutes (raised to 15 if smaller)
        #[arg(long, default_value_t = 30)]
        block_minutes: u32,
    },
}

#[derive(Args)]
struct IoArgs {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct EngineArgs {
    /// Block size in minutes (default 30, raised to 15 if smaller)
    #[arg(long)]
    block_minutes: Option<u32>,
    /// Minimum common run length in minutes (rounded up to whole blocks)
    #[arg(long)]
    min_duration: Option<u32>,
    /// Ignore candidate windows ending at or before this timestamp
    #[arg(long)]
    horizon_start: Option<String>,
    /// Ignore candidate windows starting at or after this timestamp
    #[arg(long)]
    horizon_end: Option<String>,
    /// Worker threads (defaults to one per core)
    #[arg(long)]
    workers: Option<usize>,
}

impl EngineArgs {
    /// Overlay command-line values on top of the file configuration.
    fn apply(&self, mut config: EngineConfig) -> EngineConfig {
        if let Some(block) = self.block_minutes {
            config.block_minutes = block;
        }
        if let Some(min) = self.min_duration {
            config.min_duration_minutes = Some(min);
        }
        if let Some(start) = &self.horizon_start {
            config.horizon_start = Some(start.clone());
        }
        if let Some(end) = &self.horizon_end {
            config.horizon_end = Some(end.clone());
        }
        if let Some(workers) = self.workers {
            config.workers = Some(workers);
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    init_tracing(&settings.logging, cli.verbose);

    match cli.command {
        Commands::Solve { io, engine } => {
            let engine = SchedulingEngine::new(engine.apply(settings.engine))
                .context("Invalid engine configuration")?;
            let json = read_input(io.input.as_deref())?;

            let response = engine.respond(&json);
            write_response(&io, &response)?;
            if !response.is_success() {
                process::exit(1);
            }
        }
        Commands::Runs { io, engine } => {
            let engine = SchedulingEngine::new(engine.apply(settings.engine))
                .context("Invalid engine configuration")?;
            let json = read_input(io.input.as_deref())?;

            let response = match parse_request(&json) {
                Ok(request) => {
                    BatchResponse::Success(engine.runs(&request.groups, &request.availability))
                }
                Err(e) => BatchResponse::Error(e.to_string()),
            };
            write_response(&io, &response)?;
            if !response.is_success() {
                process::exit(1);
            }
        }
        Commands::Split { io, block_minutes } => {
            let json = read_input(io.input.as_deref())?;
            let slots: Vec<TimeRange> =
                serde_json::from_str(&json).context("Failed to parse slot list")?;
            let block = EngineConfig::with_block_minutes(block_minutes).effective_block_minutes();

            let blocks = split_into_blocks(&slots, block);
            let rendered = if io.pretty {
                serde_json::to_string_pretty(&blocks)?
            } else {
                serde_json::to_string(&blocks)?
            };
            write_output(io.output.as_deref(), &rendered)?;
        }
    }

    Ok(())
}

fn write_response(io: &IoArgs, response: &BatchResponse) -> Result<()> {
    let rendered = if io.pretty {
        response.to_json_pretty()?
    } else {
        response.to_json()?
    };
    write_output(io.output.as_deref(), &rendered)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
