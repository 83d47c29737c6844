use crate::error::{Error, Result};
use crate::gc::Collector;
use crate::logging::{parse_level, LogConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GcConfig {
    /// Creations between automatic collection passes
    #[serde(default = "default_step")]
    pub step: usize,

    /// Start with collection suspended
    #[serde(default)]
    pub start_stopped: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,

    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            step: default_step(),
            start_stopped: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            file: None,
        }
    }
}

fn default_step() -> usize { Collector::DEFAULT_STEP }
fn default_level() -> String { "info".to_string() }

impl GcConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Defaults overridden by `CROSSGC_STEP` and `CROSSGC_STOPPED`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from the environment
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var("CROSSGC_STEP") {
            self.step = value
                .trim()
                .parse()
                .map_err(|_| Error::InvalidEnv { var: "CROSSGC_STEP", value })?;
        }

        if let Ok(value) = std::env::var("CROSSGC_STOPPED") {
            self.start_stopped = match value.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(Error::InvalidEnv { var: "CROSSGC_STOPPED", value }),
            };
        }

        Ok(())
    }

    /// Logging settings in the shape `logging::init_with_config` expects
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: parse_level(&self.logging.level),
            log_path: self.logging.file.clone(),
            json_format: self.logging.json,
            ..LogConfig::default()
        }
    }

    /// Generate default configuration file content
    pub fn generate_default() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate config"))
    }
}
