//! Application logging functionality
//!
//! Installs the `tracing` subscriber: human-readable output on stderr and,
//! with `--log-file`, a dated log file under the config directory.

use crate::core::config_file::ConfigFile;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// How much to log and where
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOptions {
    /// Number of `-v` flags
    pub verbosity: u8,
    pub quiet: bool,
    pub log_file: bool,
}

impl LogOptions {
    /// Filter directive for this crate when `RUST_LOG` is unset
    pub fn level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    fn directives(&self) -> String {
        format!("warn,fontsplit={}", self.level())
    }
}

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    ConfigFile::config_dir().join("logs")
}

/// Name of today's log file
pub fn current_log_file_name() -> String {
    let timestamp = chrono::Local::now().format("%Y-%m-%d");
    format!("fontsplit-{timestamp}.log")
}

/// Install the global subscriber.
///
/// Keep the returned guard alive until exit so buffered file output is
/// flushed.
pub fn init(options: LogOptions) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.directives()));

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, guard) = if options.log_file {
        let dir = logs_dir();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create logs directory {}", dir.display()))?;
        let appender = tracing_appender::rolling::never(&dir, current_log_file_name());
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install the log subscriber")?;

    if options.log_file {
        tracing::debug!("Logging to {:?}", logs_dir().join(current_log_file_name()));
    }
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        assert_eq!(LogOptions::default().level(), "info");
        let verbose = LogOptions {
            verbosity: 1,
            ..Default::default()
        };
        assert_eq!(verbose.level(), "debug");
        let very = LogOptions {
            verbosity: 3,
            ..Default::default()
        };
        assert_eq!(very.level(), "trace");
        let quiet = LogOptions {
            quiet: true,
            verbosity: 2,
            ..Default::default()
        };
        assert_eq!(quiet.level(), "warn");
        assert_eq!(quiet.directives(), "warn,fontsplit=warn");
    }

    #[test]
    fn test_log_file_name_is_dated() {
        let name = current_log_file_name();
        assert!(name.starts_with("fontsplit-"));
        assert!(name.ends_with(".log"));
        assert_eq!(name.len(), "fontsplit-YYYY-MM-DD.log".len());
    }
}
