use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{CONFIG_FILE, ENV_PREFIX};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    pub writer: WriterConfig,
    pub reader: ReaderConfig,
    pub logging: LoggingConfig,
}

/// Defaults applied by every syntax writer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Target version token (`2.1`, `3.0`, `4.0`). When absent each card is
    /// written in its own version.
    pub target_version: Option<String>,
    /// Drop properties and TYPE values the target version does not support.
    pub strict: bool,
    /// Maximum octets per text line before folding. Zero disables folding.
    pub fold_length: usize,
    /// Add a PRODID property to text output.
    pub include_prodid: bool,
    /// Indent XML and JSON output.
    pub pretty: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            target_version: None,
            strict: false,
            fold_length: 75,
            include_prodid: true,
            pretty: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Version assumed for text cards that lack a VERSION property.
    pub default_version: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            default_version: "4.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, `TESSEN__*` environment variables and
    /// an optional `tessen.toml`. The file takes precedence over the environment.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("writer.strict", false)?
            .set_default("writer.fold_length", 75)?
            .set_default("writer.include_prodid", true)?
            .set_default("writer.pretty", false)?
            .set_default("reader.default_version", "4.0")?
            .set_default("logging.level", "info")?
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .build()?
            .try_deserialize::<Settings>()?;

        tracing::debug!(?settings, "Loaded configuration");
        Ok(settings)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_defaults() {
        let writer = WriterConfig::default();
        assert_eq!(writer.fold_length, 75);
        assert!(writer.include_prodid);
        assert!(!writer.strict);
        assert!(writer.target_version.is_none());
    }

    #[test]
    fn reader_defaults_to_v4() {
        assert_eq!(ReaderConfig::default().default_version, "4.0");
    }

    #[test_log::test]
    fn load_without_sources_uses_defaults() {
        let settings = Settings::load().expect("defaults should deserialize");
        assert_eq!(settings.reader.default_version, "4.0");
        assert_eq!(settings.writer.fold_length, 75);
    }
}
