//! Tracing setup.
//!
//! Logs go to stderr so command output on stdout stays clean. A project can
//! also keep a daily-rolling JSON log under its data directory through the
//! `[logging]` section of `.valuerank.toml`.

use crate::config::RankConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILE: &str = "valuerank.log";

/// Logging setup after merging CLI flags over the project's `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub filter: String,
    pub file: Option<PathBuf>,
}

impl LogOptions {
    /// `-v` beats the configured level; `--log-file` beats the configured file.
    pub fn resolve(
        verbose: bool,
        log_file: Option<PathBuf>,
        project: Option<(&RankConfig, &Path)>,
    ) -> Self {
        let level = match project {
            _ if verbose => "debug".to_string(),
            Some((config, _)) if !config.logging.level.trim().is_empty() => {
                config.logging.level.trim().to_string()
            }
            _ => "info".to_string(),
        };
        // A bare level applies to this crate only; directives pass through
        let filter = if level.contains('=') || level.contains(',') {
            level
        } else {
            format!("valuerank={}", level)
        };

        let file = log_file.or_else(|| project.and_then(|(config, root)| config.log_file_path(root)));
        Self { filter, file }
    }
}

/// Installs the global subscriber. A second call is a no-op.
pub fn init(options: &LogOptions) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&options.filter));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer);

    let Some(log_path) = &options.file else {
        let _ = subscriber.try_init();
        return;
    };

    let dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Cannot create log directory {}: {}", dir.display(), e);
        let _ = subscriber.try_init();
        return;
    }
    let file_name = log_path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new(DEFAULT_LOG_FILE));

    let file_layer = fmt::layer()
        .with_writer(tracing_appender::rolling::daily(dir, file_name))
        .with_ansi(false)
        .json();

    let _ = subscriber.with(file_layer).try_init();
}
