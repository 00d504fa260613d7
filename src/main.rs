//! ogshot - Open Graph preview image generator.
//!
//! Screenshots each route listed in a site's `seo.json` into a 1200x630
//! WebP preview and reconciles the generated files on disk: missing images
//! are captured, orphaned ones can be deleted.

#![allow(dead_code)]

mod cli;
mod codec;
mod config;
mod core;
mod logger;
mod prompt;
mod reconcile;
mod render;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    match &cli.command {
        Commands::Generate { args } => cli::generate::run_generate(&cli, args),
        Commands::Clean { args } => cli::clean::run_clean(&cli, args),
    }
}
