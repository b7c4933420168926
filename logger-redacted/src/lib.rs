//! Structured logging with automatic PII redaction for FoodLog Engine
//!
//! Account emails and bearer tokens must never reach log output in clear text.
//! This crate installs the global `tracing` subscriber and exposes the
//! [`PiiRedactor`] used by the identity and HTTP layers before they log
//! anything derived from a request.
//!
//! # Example
//!
//! ```rust
//! use logger_redacted::{PiiRedactor, RedactionConfig};
//!
//! let redactor = PiiRedactor::new(RedactionConfig::default());
//! let line = redactor.redact("login for parent@example.com");
//! assert!(!line.contains("parent@example.com"));
//! ```

pub mod config;
pub mod macros;
pub mod redactor;

pub use config::*;
pub use redactor::*;

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter `{0}`")]
    InvalidFilter(String),

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level` when set.
pub fn init(config: &LoggerConfig) -> Result<(), LoggerError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives(&config.log_level))
            .map_err(|_| LoggerError::InvalidFilter(config.log_level.clone()))?,
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().with_target(false).json())
            .try_init(),
    }
    .map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))
}

fn default_directives(level: &str) -> String {
    format!("{level},tower_http=info,sqlx=warn,hyper=info")
}
