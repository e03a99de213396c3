// TOML config adapter - Reads the `[framesift]` table of a configuration file

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::errors::*;

/// Name of the configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "framesift.toml";

/// Values set by a configuration file; absent keys stay `None`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub ignore_vertical: Option<bool>,
    pub probe_backend: Option<String>,
    pub log_level: Option<String>,
    pub frame_width: Option<u32>,
    pub frame_height: Option<u32>,
    pub every_nth: Option<u64>,
    pub max_frames: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    framesift: FileSettings,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse configuration text; a document without `[framesift]` yields empty settings
    pub fn parse(content: &str) -> Result<FileSettings, DomainError> {
        let document: ConfigDocument = toml::from_str(content)
            .map_err(|e| DomainError::Config(format!("Failed to parse TOML config: {}", e)))?;
        Ok(document.framesift)
    }

    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<FileSettings, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let settings = Self::parse(&content)?;
        debug!(path = %path.display(), ?settings, "Loaded config file");
        Ok(settings)
    }

    /// Serialize settings back into a `[framesift]` document
    pub fn render(settings: &FileSettings) -> Result<String, DomainError> {
        #[derive(Serialize)]
        struct Document<'a> {
            framesift: &'a FileSettings,
        }

        toml::to_string(&Document {
            framesift: settings,
        })
        .map_err(|e| DomainError::Config(format!("Failed to serialize config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_table() {
        let settings = TomlConfigAdapter::parse(
            r#"
            [framesift]
            input_path = "/data/raw"
            output_path = "/data/out"
            ignore_vertical = false
            probe_backend = "ffprobe"
            log_level = "debug"
            frame_width = 256
            frame_height = 128
            every_nth = 5
            max_frames = 10
            "#,
        )
        .unwrap();

        assert_eq!(settings.input_path, Some(PathBuf::from("/data/raw")));
        assert_eq!(settings.output_path, Some(PathBuf::from("/data/out")));
        assert_eq!(settings.ignore_vertical, Some(false));
        assert_eq!(settings.probe_backend.as_deref(), Some("ffprobe"));
        assert_eq!(settings.log_level.as_deref(), Some("debug"));
        assert_eq!(settings.frame_width, Some(256));
        assert_eq!(settings.frame_height, Some(128));
        assert_eq!(settings.every_nth, Some(5));
        assert_eq!(settings.max_frames, Some(10));
    }

    #[test]
    fn test_missing_table_is_empty() {
        let settings = TomlConfigAdapter::parse("[other]\nkey = 1\n").unwrap();
        assert_eq!(settings, FileSettings::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = TomlConfigAdapter::parse("[framesift]\noverwrite = true\n");
        assert!(matches!(result, Err(DomainError::Config(_))));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let result = TomlConfigAdapter::parse("[framesift]\nignore_vertical = \"yes\"\n");
        assert!(matches!(result, Err(DomainError::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = TomlConfigAdapter::load(&temp_dir.path().join("nope.toml"));
        assert!(matches!(result, Err(DomainError::Config(_))));
    }

    #[test]
    fn test_render_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_CONFIG_FILE);
        let settings = FileSettings {
            input_path: Some(PathBuf::from("in")),
            every_nth: Some(3),
            ..FileSettings::default()
        };

        std::fs::write(&path, TomlConfigAdapter::render(&settings).unwrap()).unwrap();
        assert_eq!(TomlConfigAdapter::load(&path).unwrap(), settings);
    }
}
