// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for PyNAM
//!
//! Console output always; with the `file-logging` feature, a combined JSON log
//! file in a timestamped run folder with configurable retention.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingConfig};

const RUN_PREFIX: &str = "run_";
const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Keeps file writers alive; logs are flushed when dropped
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder receiving log files, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Name of the run folder created for a logging session
pub fn run_folder_name(now: DateTime<Utc>) -> String {
    format!("{}{}", RUN_PREFIX, now.format(RUN_TIMESTAMP_FORMAT))
}

fn parse_run_folder(name: &str) -> Option<DateTime<Utc>> {
    let timestamp = name.strip_prefix(RUN_PREFIX)?;
    NaiveDateTime::parse_from_str(timestamp, RUN_TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.and_utc())
}

/// Initialize the global subscriber
///
/// # Arguments
/// * `debug_flags` - Per-crate debug flags for filtering
/// * `config` - Level, console format and file logging settings
///
/// # Errors
/// Fails if a global subscriber is already installed or the log directory
/// cannot be created.
pub fn init_logging(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = debug_flags.to_filter_string(&config.level);
    let env_filter = EnvFilter::try_new(&filter)
        .with_context(|| format!("Invalid log filter: {}", filter))?;

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let console_layer = match config.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_filter(env_filter.clone())
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(env_filter.clone())
            .boxed(),
    };
    layers.push(console_layer);

    #[cfg(feature = "file-logging")]
    let (file_guards, log_dir) = match &config.log_dir {
        Some(base_log_dir) => {
            let run_folder = base_log_dir.join(run_folder_name(Utc::now()));
            std::fs::create_dir_all(&run_folder).with_context(|| {
                format!("Failed to create log directory: {}", run_folder.display())
            })?;
            cleanup_old_logs(base_log_dir, config.retention_days, config.retention_runs)?;

            let appender = tracing_appender::rolling::never(&run_folder, "pynam.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .json()
                .with_filter(env_filter)
                .boxed();
            layers.push(file_layer);
            (vec![guard], Some(run_folder))
        }
        None => (Vec::new(), None),
    };

    #[cfg(not(feature = "file-logging"))]
    let log_dir: Option<PathBuf> = None;

    Registry::default()
        .with(layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: file_guards,
        log_dir,
    })
}

/// Initialize console logging with default settings
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    init_logging(debug_flags, &LoggingConfig::default())
}

/// Remove run folders older than `retention_days`, then keep at most
/// `retention_runs` of the remaining ones
pub fn cleanup_old_logs(base_log_dir: &Path, retention_days: u64, retention_runs: usize) -> Result<()> {
    if !base_log_dir.exists() {
        return Ok(());
    }

    let cutoff_date = Utc::now() - chrono::Duration::days(retention_days as i64);

    let mut runs: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(dt) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(parse_run_folder)
        {
            runs.push((path, dt));
        }
    }

    // newest first
    runs.sort_by_key(|(_, dt)| std::cmp::Reverse(*dt));

    for (index, (path, dt)) in runs.iter().enumerate() {
        if *dt < cutoff_date || index >= retention_runs {
            if let Err(e) = std::fs::remove_dir_all(path) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove old log directory");
            }
        }
    }

    Ok(())
}
