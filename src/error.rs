use std::fmt;
use std::path::PathBuf;

/// Errors from the fallible edges of the crate: configuration and logger
/// setup. Collector operations themselves are total.
#[derive(Debug)]
pub enum Error {
    ReadConfig { path: PathBuf, source: std::io::Error },
    ParseConfig(toml::de::Error),
    InvalidEnv { var: &'static str, value: String },
    Logging(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadConfig { path, source } => {
                write!(f, "Failed to read config {}: {}", path.display(), source)
            }
            Self::ParseConfig(e) => {
                write!(f, "Failed to parse config: {}", e)
            }
            Self::InvalidEnv { var, value } => {
                write!(f, "Invalid value for {}: {:?}", var, value)
            }
            Self::Logging(message) => {
                write!(f, "Failed to initialize logging: {}", message)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadConfig { source, .. } => Some(source),
            Self::ParseConfig(e) => Some(e),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::ParseConfig(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
