use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vidingest")]
#[command(
    author,
    version,
    about = "Download or convert a video, extract its audio, upload it to the knowledge base"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Video URL to process (shorthand for `ingest <URL>`)
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Output directory for the downloaded video and extracted audio
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep intermediate files (for debugging)
    #[arg(long)]
    pub keep_temp: bool,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download a video URL, extract its audio, upload to the knowledge base
    Ingest {
        /// Video URL
        url: String,

        #[command(flatten)]
        options: JobOptions,
    },

    /// Extract audio from an existing local video file and upload it
    Local {
        /// Path to the video file
        file: PathBuf,

        #[command(flatten)]
        options: JobOptions,
    },

    /// Check external tools and API configuration
    Doctor,

    /// Show configuration
    Config,
}

#[derive(clap::Args, Clone)]
pub struct JobOptions {
    /// Output directory for produced files
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep intermediate files (for debugging)
    #[arg(long)]
    pub keep_temp: bool,
}
