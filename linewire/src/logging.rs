//! Logging setup for the `linewire` binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is
//! left to the binary. Logs go to stderr so they never mix with the
//! session bytes.

use clap::ValueEnum;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive that overrides
/// the command-line level.
pub const LOG_FILTER_ENV: &str = "LINEWIRE_LOG";

#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Debug, Error)]
pub enum InitError {
    #[error("invalid {LOG_FILTER_ENV} directive: {0}")]
    Filter(String),
    #[error("failed to install logger: {0}")]
    Install(String),
}

static INIT: OnceLock<()> = OnceLock::new();

/// Installs the global subscriber. Later calls are no-ops.
///
/// # Errors
///
/// Fails if `LINEWIRE_LOG` does not parse or another subscriber is
/// already installed.
pub fn init(level: LogLevel) -> Result<(), InitError> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let filter = match std::env::var(LOG_FILTER_ENV) {
        Ok(directive) => {
            EnvFilter::try_new(&directive).map_err(|err| InitError::Filter(err.to_string()))?
        }
        Err(_) => EnvFilter::default().add_directive(level.to_filter().into()),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .with_target(level >= LogLevel::Debug)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| InitError::Install(err.to_string()))?;

    let _ = INIT.set(());
    Ok(())
}
