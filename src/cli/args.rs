//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::config_initialization::ExtractionStrategy;

/// Output format of the discover command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One path per line, then the count
    #[default]
    Text,
    Json,
    Yaml,
}

/// Arguments for the discover command
#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Include the output directory of every file
    #[arg(long)]
    pub mapping: bool,
}

/// Arguments for the classify command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// File to classify
    pub file: PathBuf,
}

/// Arguments for the process command
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Frame extraction strategy
    #[arg(long, value_enum, default_value_t = ExtractionStrategy::Libav)]
    pub strategy: ExtractionStrategy,

    /// Width of extracted frames
    #[arg(long)]
    pub frame_width: Option<u32>,

    /// Height of extracted frames
    #[arg(long)]
    pub frame_height: Option<u32>,

    /// Keep one decoded frame out of every N
    #[arg(long, value_name = "N")]
    pub every_nth: Option<u64>,

    /// Stop after this many frames per video
    #[arg(long)]
    pub max_frames: Option<u64>,
}
