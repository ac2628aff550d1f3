//! Console configuration loading from file and environment variables.

use farmlink_voice::VoiceConfig;
use serde::Deserialize;
use thiserror::Error;

/// Top-level console configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Voice pipeline tuning.
    #[serde(default)]
    pub voice: VoiceConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Initial page state for the simulated browser.
    #[serde(default)]
    pub console: ConsoleConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "farmlink_voice=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Starting state of the simulated page.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Display language code.
    #[serde(default = "default_language")]
    pub language: String,

    /// Path the page starts on.
    #[serde(default = "default_start_path")]
    pub start_path: String,

    /// Role to start logged in as. Logged out when absent.
    #[serde(default)]
    pub user: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_start_path() -> String {
    "/".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            start_path: default_start_path(),
            user: None,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `FARMLINK_LOG_LEVEL` overrides `logging.level`
/// - `FARMLINK_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `FARMLINK_LANGUAGE` overrides `console.language`
/// - `FARMLINK_START_PATH` overrides `console.start_path`
/// - `FARMLINK_USER` overrides `console.user`
/// - `FARMLINK_RECOGNITION_LOCALE` overrides `voice.recognition_locale`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Applies `FARMLINK_*` overrides read through `lookup`.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(level) = lookup("FARMLINK_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("FARMLINK_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(language) = lookup("FARMLINK_LANGUAGE") {
        config.console.language = language;
    }
    if let Some(path) = lookup("FARMLINK_START_PATH") {
        config.console.start_path = path;
    }
    if let Some(user) = lookup("FARMLINK_USER") {
        config.console.user = (!user.trim().is_empty()).then_some(user);
    }
    if let Some(locale) = lookup("FARMLINK_RECOGNITION_LOCALE") {
        config.voice.recognition_locale = locale;
    }
}
