//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// ogshot - Open Graph preview image generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Route config file path
    #[arg(short = 'C', long, global = true, default_value = "seo.json", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Capture OG images for routes whose image is missing (or all with --overwrite)
    #[command(visible_alias = "g")]
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },

    /// Delete generated OG images no longer referenced by any route
    #[command(visible_alias = "c")]
    Clean {
        #[command(flatten)]
        args: CleanArgs,
    },
}

/// Generate command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Local server host
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Local server port
    #[arg(short, long, default_value_t = 4173)]
    pub port: u16,

    /// Output directory for images
    #[arg(short, long, default_value = "public", value_hint = clap::ValueHint::DirPath)]
    pub out: PathBuf,

    /// Overwrite existing images without prompting
    #[arg(long)]
    pub overwrite: bool,

    /// Delete orphaned OG images after generation
    #[arg(long)]
    pub cleanup: bool,

    /// With --cleanup, list files that would be deleted without deleting them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Browser binary to use instead of probing PATH
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub browser: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// Clean command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct CleanArgs {
    /// Output directory for images
    #[arg(short, long, default_value = "public", value_hint = clap::ValueHint::DirPath)]
    pub out: PathBuf,

    /// List files that would be deleted without deleting them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}
