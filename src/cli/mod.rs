//! CLI Module
//!
//! Command-line surface for the clip-splicer importer.

pub mod commands;

use std::path::PathBuf;

use clap::Parser;

/// Clip Splicer - import a disc specification into a session timeline
#[derive(Parser, Debug)]
#[command(name = "clip-splicer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the specification JSON document
    pub spec: PathBuf,

    /// Pause length in seconds, repeatable: --pause _PAUSE_AFTER_WORD=4
    ///
    /// Kinds not covered here are prompted for interactively.
    #[arg(long = "pause", value_name = "KIND=SECONDS")]
    pub pauses: Vec<String>,

    /// Directory holding the clip WAV files (default: <spec folder>/clips)
    #[arg(long, value_name = "DIR")]
    pub clips_dir: Option<PathBuf>,

    /// Skip writing the availability report file
    #[arg(long)]
    pub no_report: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
