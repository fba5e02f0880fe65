//! Diagnostic logging
//!
//! Off by default so nothing is written over the picker. `GPICK_LOG` sets the
//! filter (e.g. `GPICK_LOG=debug`) and sends logs to stderr; adding
//! `GPICK_LOG_FILE=/path` appends them to a file instead.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_ENV: &str = "GPICK_LOG";
const LOG_FILE_ENV: &str = "GPICK_LOG_FILE";

pub fn init_logging() -> anyhow::Result<()> {
    let log_file = std::env::var_os(LOG_FILE_ENV).map(PathBuf::from);
    if std::env::var_os(LOG_ENV).is_none() && log_file.is_none() {
        return Ok(());
    }

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    match log_file {
        Some(path) => {
            let file = File::options().create(true).append(true).open(&path)?;
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_target(true)
                        .with_writer(Arc::new(file)),
                )
                .with(env_filter)
                .try_init()?;
        }
        None => {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_writer(std::io::stderr),
                )
                .with(env_filter)
                .try_init()?;
        }
    }

    Ok(())
}
