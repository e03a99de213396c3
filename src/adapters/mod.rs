// Adapters - External system implementations

use std::path::Path;

use crate::domain::errors::DomainError;

pub mod frames_libav;
pub mod probe_ffprobe;
pub mod probe_libav;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use frames_libav::{FrameSettings, LibavFrameExtractor};
pub use probe_ffprobe::FfprobeAdapter;
pub use probe_libav::LibavProbeAdapter;
pub use toml_config::TomlConfigAdapter;

/// Zero-length regular files are never media containers
pub(crate) fn reject_empty_file(path: &Path) -> Result<(), DomainError> {
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() && metadata.len() == 0 => {
            Err(DomainError::MalformedContainer {
                path: path.to_path_buf(),
                diagnostic: "file is empty".to_string(),
            })
        }
        _ => Ok(()),
    }
}
