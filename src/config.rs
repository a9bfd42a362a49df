use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Backend endpoint settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub timeout_secs: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

/// Search parameter defaults and bounds
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_top_k")]
    pub default_top_k: u16,
    #[serde(default = "default_max_top_k")]
    pub max_top_k: u16,
    #[serde(default)]
    pub default_min_similarity: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_top_k: default_top_k(),
            max_top_k: default_max_top_k(),
            default_min_similarity: 0.0,
        }
    }
}

fn default_top_k() -> u16 { 12 }
fn default_max_top_k() -> u16 { 50 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Configuration file (config/local.toml, development overrides)
    /// 4. Environment variables (prefixed with VPM_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g. VPM_API__BASE_URL -> api.base_url
            .add_source(
                Environment::with_prefix("VPM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_env_shortcuts(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("VPM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_env_shortcuts(settings)?;

        settings.try_deserialize()
    }
}

/// Apply convenience environment variables that don't fit the VPM_ scheme.
/// API_URL is checked first, then VPM_API__BASE_URL.
fn apply_env_shortcuts(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(base_url) = env::var("API_URL").or_else(|_| env::var("VPM_API__BASE_URL")) {
        builder = builder.set_override("api.base_url", base_url)?;
    }

    builder.build()
}
