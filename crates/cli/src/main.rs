#![forbid(unsafe_code)]

//! `lineage`: run traceability and impact analysis over a snapshot file.
//!
//! ```bash
//! lineage coverage --snapshot project.json --filter uncovered --query login
//! lineage impact --snapshot project.json --node REQ-1 --direction downstream --depth 2
//! cat project.json | lineage validate --snapshot -
//! ```

mod commands;
mod error;

use clap::{Args, Parser, Subcommand};
use lineage_trace::{CoverageFilter, DEFAULT_MAX_DEPTH, Direction};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "lineage")]
#[command(version)]
#[command(about = "Traceability and impact analysis over a project lineage snapshot")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct Source {
    /// Snapshot JSON file (`-` reads stdin)
    #[arg(long, env = "LINEAGE_SNAPSHOT")]
    snapshot: String,

    /// Vocabulary file (.yaml/.yml/.json); the requirements vocabulary when omitted
    #[arg(long, env = "LINEAGE_VOCABULARY")]
    vocabulary: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Requirement coverage matrix with aggregate statistics
    Coverage {
        #[command(flatten)]
        source: Source,

        /// all | covered | partial | uncovered
        #[arg(long, default_value = "all")]
        filter: CoverageFilter,

        /// Case-insensitive match against requirement code and title
        #[arg(long, default_value = "")]
        query: String,
    },

    /// Upstream or downstream impact set of one node
    Impact {
        #[command(flatten)]
        source: Source,

        /// Start node id
        #[arg(long)]
        node: String,

        /// upstream | downstream
        #[arg(long, default_value = "downstream")]
        direction: Direction,

        /// Maximum traversal depth (0 = start node only)
        #[arg(long, env = "LINEAGE_DEPTH", default_value_t = i64::from(DEFAULT_MAX_DEPTH), allow_negative_numbers = true)]
        depth: i64,

        /// Follow only these relationships (repeatable)
        #[arg(long = "rel")]
        relationships: Vec<String>,
    },

    /// Stories and tasks with no upstream link
    Orphans {
        #[command(flatten)]
        source: Source,
    },

    /// Data-integrity gaps in the snapshot
    Validate {
        #[command(flatten)]
        source: Source,

        #[arg(long, default_value_t = 100)]
        max_issues: usize,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("LINEAGE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let mut stdout = std::io::stdout().lock();
    match commands::run(cli.command, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("lineage: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
