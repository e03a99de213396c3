//! framesift
//!
//! Discovers the video files in a directory, keeps the horizontal ones and
//! extracts frames from each into its own output directory.
//!
//! # Usage
//!
//! ```bash
//! framesift --input-path raw-videos discover --format json --mapping
//! framesift classify raw-videos/clip.mp4
//! framesift --input-path raw-videos --output-path output process --max-frames 100
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use framesift::adapters::tracing_log::init_tracing;
use framesift::app::container::DefaultAppContainer;
use framesift::cli::{commands, Cli, Commands};
use framesift::config_initialization::initialize_configuration_hierarchy;

/// Main entry point for the framesift CLI application
fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = initialize_configuration_hierarchy(&cli.overrides())
        .context("Failed to load configuration")?;
    init_tracing(&settings.log_level, cli.json_logs).context("Failed to initialize logging")?;
    debug!(?settings, "Resolved configuration");

    let container = DefaultAppContainer::new(settings).context("Failed to initialize media backend")?;
    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Commands::Discover(args) => {
            info!("Executing discover command");
            commands::discover(&container, args, &mut stdout)?;
        }
        Commands::Classify(args) => {
            info!("Executing classify command");
            commands::classify(&container, args, &mut stdout)?;
        }
        Commands::Process(args) => {
            info!("Executing process command");
            commands::process(&container, args, &mut stdout)?;
        }
    }

    Ok(())
}
