//! Configuration initialization and hierarchy management
//!
//! Precedence, highest first: CLI > environment (`FRAMESIFT_*`) > config file > defaults.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adapters::toml_config::{FileSettings, TomlConfigAdapter, DEFAULT_CONFIG_FILE};
use crate::adapters::tracing_log::parse_log_level;
use crate::adapters::FrameSettings;
use crate::domain::errors::*;
use crate::domain::model::*;

const ENV_PREFIX: &str = "FRAMESIFT_";

/// Which prober backs [`ProbePort`](crate::ports::ProbePort)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ProbeBackend {
    /// Linked libav libraries
    #[default]
    Libav,
    /// The `ffprobe` executable
    Ffprobe,
}

impl ProbeBackend {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "libav" => Ok(ProbeBackend::Libav),
            "ffprobe" => Ok(ProbeBackend::Ffprobe),
            other => Err(DomainError::Config(format!(
                "Unknown probe backend '{}', expected libav or ffprobe",
                other
            ))),
        }
    }
}

impl fmt::Display for ProbeBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeBackend::Libav => write!(f, "libav"),
            ProbeBackend::Ffprobe => write!(f, "ffprobe"),
        }
    }
}

/// Frame extraction strategy handed to the filter
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    /// Decode with libav and write PNG frames
    #[default]
    Libav,
    /// No extraction; every file fails with "not implemented"
    Unsupported,
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionStrategy::Libav => write!(f, "libav"),
            ExtractionStrategy::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Values given on the command line; `None` leaves lower layers in place
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub include_vertical: bool,
    pub probe_backend: Option<ProbeBackend>,
    pub log_level: Option<String>,
    pub frame_width: Option<u32>,
    pub frame_height: Option<u32>,
    pub every_nth: Option<u64>,
    pub max_frames: Option<u64>,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub filter: FilterConfig,
    pub probe_backend: ProbeBackend,
    pub log_level: String,
    pub frames: FrameSettings,
    /// Config file that contributed, if any
    pub config_file: Option<PathBuf>,
}

impl Settings {
    fn defaults(filter: FilterConfig) -> Self {
        Self {
            filter,
            probe_backend: ProbeBackend::default(),
            log_level: "info".to_string(),
            frames: FrameSettings::default(),
            config_file: None,
        }
    }

    /// Overlay every key present in `layer`
    fn apply(&mut self, layer: FileSettings) -> Result<(), DomainError> {
        if let Some(input_path) = layer.input_path {
            self.filter.input_path = input_path;
        }
        if let Some(output_path) = layer.output_path {
            self.filter.output_path = output_path;
        }
        if let Some(ignore_vertical) = layer.ignore_vertical {
            self.filter.ignore_vertical = ignore_vertical;
        }
        if let Some(backend) = layer.probe_backend {
            self.probe_backend = ProbeBackend::parse(&backend)?;
        }
        if let Some(level) = layer.log_level {
            self.log_level = parse_log_level(&level)?;
        }
        if let Some(width) = layer.frame_width {
            self.frames.size.width = width;
        }
        if let Some(height) = layer.frame_height {
            self.frames.size.height = height;
        }
        if let Some(every_nth) = layer.every_nth {
            self.frames.every_nth = every_nth;
        }
        if let Some(max_frames) = layer.max_frames {
            self.frames.max_frames = Some(max_frames);
        }
        Ok(())
    }

    fn apply_cli(&mut self, cli: &CliOverrides) -> Result<(), DomainError> {
        self.apply(FileSettings {
            input_path: cli.input_path.clone(),
            output_path: cli.output_path.clone(),
            ignore_vertical: cli.include_vertical.then_some(false),
            probe_backend: cli.probe_backend.map(|b| b.to_string()),
            log_level: cli.log_level.clone(),
            frame_width: cli.frame_width,
            frame_height: cli.frame_height,
            every_nth: cli.every_nth,
            max_frames: cli.max_frames,
        })
    }
}

/// Resolve settings from the process environment and the working directory
pub fn initialize_configuration_hierarchy(cli: &CliOverrides) -> Result<Settings, DomainError> {
    resolve_settings(
        cli,
        |key: &str| std::env::var(key).ok(),
        FilterConfig::program_defaults()?,
        Path::new("."),
    )
}

/// Resolve settings with an explicit environment lookup, defaults and working directory
pub fn resolve_settings<E>(
    cli: &CliOverrides,
    env: E,
    defaults: FilterConfig,
    working_dir: &Path,
) -> Result<Settings, DomainError>
where
    E: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::defaults(defaults);

    if let Some(path) = locate_config_file(cli, &env, working_dir) {
        info!(path = %path.display(), "Loading configuration file");
        settings.apply(TomlConfigAdapter::load(&path)?)?;
        settings.config_file = Some(path);
    } else {
        debug!("No configuration file found");
    }

    let env_layer = environment_layer(&env)?;
    if env_layer != FileSettings::default() {
        debug!(?env_layer, "Applying environment overrides");
    }
    settings.apply(env_layer)?;

    settings.apply_cli(cli)?;
    settings.frames.validate()?;
    Ok(settings)
}

/// `--config`, then `FRAMESIFT_CONFIG`, then `framesift.toml` if it exists
fn locate_config_file<E>(cli: &CliOverrides, env: &E, working_dir: &Path) -> Option<PathBuf>
where
    E: Fn(&str) -> Option<String>,
{
    if let Some(path) = &cli.config {
        return Some(path.clone());
    }
    if let Some(path) = env(&env_key("config")).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    let local = working_dir.join(DEFAULT_CONFIG_FILE);
    local.is_file().then_some(local)
}

fn env_key(name: &str) -> String {
    format!("{}{}", ENV_PREFIX, name.to_ascii_uppercase())
}

fn environment_layer<E>(env: &E) -> Result<FileSettings, DomainError>
where
    E: Fn(&str) -> Option<String>,
{
    let get = |name: &str| env(&env_key(name)).filter(|v| !v.trim().is_empty());

    Ok(FileSettings {
        input_path: get("input_path").map(PathBuf::from),
        output_path: get("output_path").map(PathBuf::from),
        ignore_vertical: get("ignore_vertical")
            .map(|v| parse_bool("ignore_vertical", &v))
            .transpose()?,
        probe_backend: get("probe_backend"),
        log_level: get("log_level"),
        frame_width: get("frame_width")
            .map(|v| parse_number("frame_width", &v))
            .transpose()?,
        frame_height: get("frame_height")
            .map(|v| parse_number("frame_height", &v))
            .transpose()?,
        every_nth: get("every_nth")
            .map(|v| parse_number("every_nth", &v))
            .transpose()?,
        max_frames: get("max_frames")
            .map(|v| parse_number("max_frames", &v))
            .transpose()?,
    })
}

fn parse_bool(name: &str, value: &str) -> Result<bool, DomainError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(DomainError::Config(format!(
            "Invalid boolean value for {}: {}",
            env_key(name),
            value
        ))),
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, DomainError>
where
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e| {
        DomainError::Config(format!(
            "Invalid value for {}: {}: {}",
            env_key(name),
            value,
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn defaults() -> FilterConfig {
        FilterConfig::rooted_at(Path::new("/opt/framesift"))
    }

    #[test]
    fn test_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let settings = resolve_settings(
            &CliOverrides::default(),
            env_from(&[]),
            defaults(),
            temp_dir.path(),
        )
        .unwrap();

        assert_eq!(settings.filter, defaults());
        assert!(settings.filter.ignore_vertical);
        assert_eq!(settings.probe_backend, ProbeBackend::Libav);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.frames, FrameSettings::default());
        assert_eq!(settings.config_file, None);
    }

    #[test]
    fn test_local_config_file_is_picked_up() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(DEFAULT_CONFIG_FILE),
            "[framesift]\ninput_path = \"/videos\"\nevery_nth = 4\n",
        )
        .unwrap();

        let settings = resolve_settings(
            &CliOverrides::default(),
            env_from(&[]),
            defaults(),
            temp_dir.path(),
        )
        .unwrap();

        assert_eq!(settings.filter.input_path, PathBuf::from("/videos"));
        assert_eq!(settings.filter.output_path, defaults().output_path);
        assert_eq!(settings.frames.every_nth, 4);
        assert_eq!(
            settings.config_file,
            Some(temp_dir.path().join(DEFAULT_CONFIG_FILE))
        );
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().join("custom.toml");
        std::fs::write(
            &config,
            r#"
            [framesift]
            input_path = "/from-file"
            output_path = "/out-file"
            log_level = "warn"
            frame_width = 100
            "#,
        )
        .unwrap();

        let env = env_from(&[
            ("FRAMESIFT_CONFIG", config.to_str().unwrap()),
            ("FRAMESIFT_INPUT_PATH", "/from-env"),
            ("FRAMESIFT_LOG_LEVEL", "debug"),
            ("FRAMESIFT_PROBE_BACKEND", "ffprobe"),
        ]);
        let cli = CliOverrides {
            input_path: Some(PathBuf::from("/from-cli")),
            include_vertical: true,
            ..CliOverrides::default()
        };

        let settings = resolve_settings(&cli, env, defaults(), temp_dir.path()).unwrap();

        assert_eq!(settings.filter.input_path, PathBuf::from("/from-cli"));
        assert_eq!(settings.filter.output_path, PathBuf::from("/out-file"));
        assert!(!settings.filter.ignore_vertical);
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.probe_backend, ProbeBackend::Ffprobe);
        assert_eq!(settings.frames.size.width, 100);
        assert_eq!(settings.config_file, Some(config));
    }

    #[test]
    fn test_cli_config_beats_env_config() {
        let temp_dir = TempDir::new().unwrap();
        let from_cli = temp_dir.path().join("cli.toml");
        let from_env = temp_dir.path().join("env.toml");
        std::fs::write(&from_cli, "[framesift]\nmax_frames = 1\n").unwrap();
        std::fs::write(&from_env, "[framesift]\nmax_frames = 2\n").unwrap();

        let cli = CliOverrides {
            config: Some(from_cli.clone()),
            ..CliOverrides::default()
        };
        let env = env_from(&[("FRAMESIFT_CONFIG", from_env.to_str().unwrap())]);
        let settings = resolve_settings(&cli, env, defaults(), temp_dir.path()).unwrap();

        assert_eq!(settings.frames.max_frames, Some(1));
        assert_eq!(settings.config_file, Some(from_cli));
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliOverrides {
            config: Some(temp_dir.path().join("missing.toml")),
            ..CliOverrides::default()
        };

        let result = resolve_settings(&cli, env_from(&[]), defaults(), temp_dir.path());
        assert!(matches!(result, Err(DomainError::Config(_))));
    }

    #[test]
    fn test_env_ignore_vertical_and_numbers() {
        let temp_dir = TempDir::new().unwrap();
        let env = env_from(&[
            ("FRAMESIFT_IGNORE_VERTICAL", "false"),
            ("FRAMESIFT_FRAME_HEIGHT", "64"),
            ("FRAMESIFT_MAX_FRAMES", "12"),
        ]);

        let settings =
            resolve_settings(&CliOverrides::default(), env, defaults(), temp_dir.path()).unwrap();
        assert!(!settings.filter.ignore_vertical);
        assert_eq!(settings.frames.size.height, 64);
        assert_eq!(settings.frames.max_frames, Some(12));
    }

    #[test]
    fn test_invalid_env_values_rejected() {
        let temp_dir = TempDir::new().unwrap();
        for (key, value) in [
            ("FRAMESIFT_IGNORE_VERTICAL", "sometimes"),
            ("FRAMESIFT_EVERY_NTH", "many"),
            ("FRAMESIFT_PROBE_BACKEND", "gstreamer"),
            ("FRAMESIFT_LOG_LEVEL", "loud"),
            ("FRAMESIFT_EVERY_NTH", "0"),
        ] {
            let result = resolve_settings(
                &CliOverrides::default(),
                env_from(&[(key, value)]),
                defaults(),
                temp_dir.path(),
            );
            assert!(
                matches!(result, Err(DomainError::Config(_))),
                "{}={} accepted",
                key,
                value
            );
        }
    }

    #[test]
    fn test_probe_backend_parse() {
        assert_eq!(ProbeBackend::parse("LibAV").unwrap(), ProbeBackend::Libav);
        assert_eq!(ProbeBackend::parse("ffprobe").unwrap(), ProbeBackend::Ffprobe);
        assert!(ProbeBackend::parse("").is_err());
        assert_eq!(ProbeBackend::Ffprobe.to_string(), "ffprobe");
    }
}
