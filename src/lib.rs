//! framesift library
//!
//! Filters a directory down to its (horizontal) video files, assigns each an
//! output directory and runs a pluggable frame extraction strategy over them.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use app::VideoSetFilter;
pub use domain::errors::{DomainError, DomainResult};
pub use domain::model::{FilterConfig, FilteredSet, MediaStream, OutputMapping};
pub use ports::{FrameExtractor, UnsupportedFrameExtractor};
