//! Logging infrastructure - structured tracing for the collector
//!
//! Design: Uses `tracing` for structured, contextual logging with:
//! - Configurable log levels via environment or config file
//! - Zero-cost when disabled
//! - Compact or JSON output, to stderr or a log file

use crate::error::Error;
use once_cell::sync::OnceCell;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

// Re-export tracing macros for use throughout the crate
pub use tracing::{debug, error, info, trace, warn, Level};

/// Global logging state
static LOGGER_INITIALIZED: OnceCell<()> = OnceCell::new();

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default log level
    pub level: Level,
    /// Log file path; stderr when unset
    pub log_path: Option<PathBuf>,
    /// Enable JSON format (vs human-readable)
    pub json_format: bool,
    /// Show span events (enter/exit)
    pub show_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            log_path: None,
            json_format: false,
            show_spans: false,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // CROSSGC_LOG_LEVEL: trace, debug, info, warn, error
        if let Ok(level) = std::env::var("CROSSGC_LOG_LEVEL") {
            config.level = parse_level(&level);
        }

        // CROSSGC_LOG_FILE: path to log file
        if let Ok(path) = std::env::var("CROSSGC_LOG_FILE") {
            config.log_path = Some(PathBuf::from(path));
        }

        config.json_format = std::env::var("CROSSGC_LOG_JSON").is_ok();
        config.show_spans = std::env::var("CROSSGC_LOG_SPANS").is_ok();

        config
    }

    /// Verbose logging, every pass and every registration
    pub fn debug() -> Self {
        Self {
            level: Level::TRACE,
            show_spans: true,
            ..Self::default()
        }
    }
}

/// Map a level name to a `Level`, defaulting to INFO
pub fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Initialize logging from the environment
pub fn init() -> Result<Option<WorkerGuard>, Error> {
    init_with_config(LogConfig::from_env())
}

/// Initialize logging with custom configuration
///
/// Only the first call installs a subscriber. When logging to a file the
/// returned guard must be kept alive so buffered lines get flushed.
pub fn init_with_config(config: LogConfig) -> Result<Option<WorkerGuard>, Error> {
    if LOGGER_INITIALIZED.get().is_some() {
        return Ok(None);
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("crossgc={}", config.level.as_str().to_lowercase()))
    });

    let span_events = if config.show_spans {
        FmtSpan::ENTER | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let (writer, guard) = match &config.log_path {
        Some(path) => {
            let (directory, file_name) = split_log_path(path)?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(writer), Some(guard))
        }
        None => (BoxMakeWriter::new(io::stderr), None),
    };

    let layer = fmt::layer()
        .with_writer(writer)
        .with_span_events(span_events)
        .with_target(true)
        .with_thread_ids(cfg!(debug_assertions));

    let installed = if config.json_format {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.compact())
            .try_init()
    };
    installed.map_err(|e| Error::Logging(e.to_string()))?;

    LOGGER_INITIALIZED.set(()).ok();
    Ok(guard)
}

/// Check if logging is initialized
pub fn is_initialized() -> bool {
    LOGGER_INITIALIZED.get().is_some()
}

fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf), Error> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::Logging(format!("not a file path: {}", path.display())))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((directory, PathBuf::from(file_name)))
}

// ============================================================================
// Collector-specific logging functions
// ============================================================================

/// Log GC pass start
pub fn log_gc_start(registered: usize) {
    debug!(
        target: "gc",
        event = "gc_start",
        registered,
        "Starting garbage collection pass"
    );
}

/// Log GC pass completion
pub fn log_gc_complete(duration_us: u64, swept: usize, live: usize) {
    info!(
        target: "gc",
        event = "gc_complete",
        objects_swept = swept,
        live_objects = live,
        duration_us,
        "Garbage collection pass complete"
    );
}

/// Log GC mark phase
pub fn log_gc_mark(marked: usize) {
    debug!(
        target: "gc",
        event = "gc_mark",
        objects_marked = marked,
        "GC mark phase complete"
    );
}

/// Log GC sweep phase
pub fn log_gc_sweep(swept: usize) {
    debug!(
        target: "gc",
        event = "gc_sweep",
        objects_swept = swept,
        "GC sweep phase complete"
    );
}

/// Performance tracking utilities
pub mod perf {
    use std::time::Instant;
    use tracing::debug;

    /// Track operation duration (returns guard that logs on drop)
    #[must_use]
    pub fn track(operation: &str) -> PerformanceGuard {
        PerformanceGuard {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub struct PerformanceGuard {
        operation: String,
        start: Instant,
    }

    impl Drop for PerformanceGuard {
        fn drop(&mut self) {
            let elapsed = self.start.elapsed();
            debug!(
                operation = %self.operation,
                duration_us = elapsed.as_micros() as u64,
                "operation completed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = LogConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(config.log_path.is_none());

        let debug_config = LogConfig::debug();
        assert_eq!(debug_config.level, Level::TRACE);
        assert!(debug_config.show_spans);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("TRACE"), Level::TRACE);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("nonsense"), Level::INFO);
    }

    #[test]
    fn test_split_log_path() {
        let (dir, file) = split_log_path(Path::new("logs/gc.log")).unwrap();
        assert_eq!(dir, PathBuf::from("logs"));
        assert_eq!(file, PathBuf::from("gc.log"));

        let (dir, _) = split_log_path(Path::new("gc.log")).unwrap();
        assert_eq!(dir, PathBuf::from("."));

        assert!(split_log_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_init_idempotent() {
        // Another test binary may already own the global subscriber
        let first = init_with_config(LogConfig::default());
        if first.is_ok() {
            assert!(is_initialized());
            assert!(init().unwrap().is_none());
        }
    }

    #[test]
    fn test_logging_functions() {
        // These should not panic
        log_gc_start(3);
        log_gc_mark(2);
        log_gc_sweep(1);
        log_gc_complete(100, 1, 2);
        let _guard = perf::track("noop");
    }
}
