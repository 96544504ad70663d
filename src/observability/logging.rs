//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber from the `log` section
//! - Console sink (stdout) or daily-rotated file sink
//! - Optional cleanup of old log files and a cap on rotated files
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` overrides the configured level
//! - The event target (module path) identifies the caller
//! - Installing a subscriber twice is not an error; the first one stays

use std::fs;
use std::io;
use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogConfig;

/// Keeps the non-blocking file writer alive. Drop it last.
#[derive(Debug, Default)]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Install logging sinks as described by `settings`.
pub fn init(settings: &LogConfig) -> io::Result<LogGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            let level = settings.level_filter().unwrap_or(LevelFilter::DEBUG);
            EnvFilter::new(level.to_string())
        });

    let mut guard = LogGuard::default();

    let (console_layer, file_layer) = if settings.console {
        (Some(fmt::layer()), None)
    } else {
        let dir = Path::new(&settings.path);
        fs::create_dir_all(dir)?;
        if settings.clear {
            clear_log_files(dir, &settings.name)?;
        }

        let mut builder = Builder::new()
            .rotation(Rotation::DAILY)
            .filename_prefix(settings.name.clone());
        if settings.backup_count > 0 {
            builder = builder.max_log_files(settings.backup_count);
        }
        let appender = builder.build(dir).map_err(io::Error::other)?;

        let (writer, file_guard) = tracing_appender::non_blocking(appender);
        guard._file = Some(file_guard);
        (None, Some(fmt::layer().with_ansi(false).with_writer(writer)))
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    if installed.is_err() {
        tracing::debug!("Global subscriber already installed, keeping it");
    }

    Ok(guard)
}

/// Remove files in `dir` whose name starts with `prefix`.
fn clear_log_files(dir: &Path, prefix: &str) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let is_log = entry.file_name().to_string_lossy().starts_with(prefix);
        if is_log && entry.file_type()?.is_file() {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_only_removes_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("quant.log.2024-01-01"), "old").unwrap();
        fs::write(dir.path().join("quant.log"), "current").unwrap();
        fs::write(dir.path().join("other.txt"), "keep").unwrap();

        clear_log_files(dir.path(), "quant.log").unwrap();

        let remaining: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(remaining, vec!["other.txt".to_string()]);
    }

    #[test]
    fn test_file_sink_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("logs");
        let settings = LogConfig {
            console: false,
            path: path.to_string_lossy().to_string(),
            backup_count: 3,
            ..LogConfig::default()
        };

        let guard = init(&settings).unwrap();
        assert!(path.is_dir());
        drop(guard);
    }
}
