use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build an SRT file from paired .wav/.txt clips
    Generate {
        /// Input files or directories (directories are searched recursively)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output SRT file (defaults to the configured file name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seconds added to every clip (manual mode, may be negative)
        #[arg(long, allow_hyphen_values = true, conflicts_with = "target")]
        offset: Option<f64>,

        /// Desired total runtime in seconds (auto mode)
        #[arg(long, allow_hyphen_values = true)]
        target: Option<f64>,

        /// Snap cues to frames at this rate (e.g. 23.976, 24, 29.97)
        #[arg(long)]
        fps: Option<f64>,

        /// Drop partial frames instead of rounding to the nearest frame
        #[arg(long)]
        trim_overflow: bool,

        /// Disable frame locking even if the configuration enables it
        #[arg(long, conflicts_with = "fps")]
        no_frame_lock: bool,

        /// Duration decoder: wav, ffprobe
        #[arg(long)]
        decoder: Option<String>,

        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print the generated SRT to stdout
        #[arg(long)]
        preview: bool,
    },

    /// Show how input files pair up, without decoding audio
    Pairs {
        /// Input files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Write a default configuration file
    Config {
        /// Destination path
        #[arg(short, long, default_value = "clipsrt.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List common frame rates
    FrameRates,
}
