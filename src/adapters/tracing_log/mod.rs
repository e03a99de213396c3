// Tracing log adapter - Installs the global tracing subscriber

use tracing_subscriber::EnvFilter;

use crate::domain::errors::*;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Check a `--log-level` style value
pub fn parse_log_level(level: &str) -> Result<String, DomainError> {
    let normalized = level.trim().to_ascii_lowercase();
    if LOG_LEVELS.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(DomainError::Config(format!(
            "Invalid log level '{}', expected one of: {}",
            level,
            LOG_LEVELS.join(", ")
        )))
    }
}

/// Filter from `RUST_LOG` when set, otherwise from `level`
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the subscriber on stderr, keeping stdout for command output
///
/// A second call is a no-op.
pub fn init_tracing(level: &str, json: bool) -> Result<(), DomainError> {
    let level = parse_log_level(level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(&level))
        .with_writer(std::io::stderr)
        .with_target(false);

    // Already installed (e.g. by a test harness)
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("info").unwrap(), "info");
        assert_eq!(parse_log_level(" WARN ").unwrap(), "warn");
        assert!(matches!(
            parse_log_level("verbose"),
            Err(DomainError::Config(_))
        ));
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_tracing("error", false).unwrap();
        init_tracing("debug", true).unwrap();
    }
}
