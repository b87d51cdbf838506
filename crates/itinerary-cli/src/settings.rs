//! Optional settings file for the `itinerary` CLI.
//!
//! Values come from a TOML file (when given) and then from `ITINERARY_*`
//! environment variables. Command-line flags override both.

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use itinerary_engine::Pace;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Pace used when `--pace` is not given.
    #[serde(default)]
    pub default_pace: Pace,
    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Pretty-print JSON output.
    #[serde(default)]
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_pace: Pace::default(),
            log_level: default_log_level(),
            pretty: false,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder
            .add_source(Environment::with_prefix("ITINERARY"))
            .build()?
            .try_deserialize()
    }
}
