//! CLI module for framesift
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config_initialization::{CliOverrides, ProbeBackend};

pub mod args;
pub mod commands;

/// framesift
///
/// Finds the horizontal videos in a directory and extracts square frames
/// from each into its own output directory.
#[derive(Parser, Debug)]
#[command(name = "framesift")]
#[command(about = "Discover videos in a directory and extract frames from them")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./framesift.toml when present)
    #[arg(long, global = true, env = "FRAMESIFT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory scanned for videos
    #[arg(long, global = true, value_name = "DIR")]
    pub input_path: Option<PathBuf>,

    /// Root directory for per-video outputs
    #[arg(long, global = true, value_name = "DIR")]
    pub output_path: Option<PathBuf>,

    /// Keep vertical and square videos too
    #[arg(long, global = true)]
    pub include_vertical: bool,

    /// Prober used to classify files
    #[arg(long, global = true, value_enum)]
    pub probe_backend: Option<ProbeBackend>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the videos that would be processed
    Discover(args::DiscoverArgs),
    /// Report whether a single file is a (horizontal) video
    Classify(args::ClassifyArgs),
    /// Discover videos and extract frames from each
    Process(args::ProcessArgs),
}

impl Cli {
    /// Command-line layer of the configuration hierarchy
    pub fn overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides {
            config: self.config.clone(),
            input_path: self.input_path.clone(),
            output_path: self.output_path.clone(),
            include_vertical: self.include_vertical,
            probe_backend: self.probe_backend,
            log_level: self.log_level.clone(),
            ..CliOverrides::default()
        };

        if let Commands::Process(args) = &self.command {
            overrides.frame_width = args.frame_width;
            overrides.frame_height = args.frame_height;
            overrides.every_nth = args.every_nth;
            overrides.max_frames = args.max_frames;
        }

        overrides
    }
}
