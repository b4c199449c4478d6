use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "wort-quiz.log";

/// Keeps the non-blocking file writer flushing until dropped.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Installs the global subscriber: stdout always, plus a daily rolling file
/// when `config.log_dir` is set and the directory can be created.
pub fn init_tracing(config: &Config) -> Option<FileLogGuard> {
    let env_filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let mut guard = None;
    let file_layer = config
        .log_dir
        .as_deref()
        .and_then(|dir| match file_writer(dir) {
            Ok((writer, worker)) => {
                guard = Some(FileLogGuard { _guard: worker });
                Some(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
            }
            Err(err) => {
                eprintln!("file logging disabled, cannot use {}: {err}", dir.display());
                None
            }
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .init();

    guard
}

fn file_writer(dir: &Path) -> std::io::Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}
