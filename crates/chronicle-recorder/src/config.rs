//! Recorder configuration, sourced from the process environment.

use std::path::PathBuf;

use crate::error::RecorderError;

/// Output events file path. Required; absence is fatal at startup.
pub const EVENTS_FILE_ENV: &str = "CHRONICLE_EVENTS_FILE";

/// Retry count of the enclosing operation. Optional, opaque.
pub const RETRY_COUNT_ENV: &str = "CHRONICLE_CURRENT_RETRY_COUNT";

/// Correlation id of the enclosing operation. Optional, opaque.
pub const CORRELATION_ID_ENV: &str = "CHRONICLE_EVENT_CORRELATION_ID";

/// Session configuration, captured once at startup.
///
/// The two context values are attached unchanged to every record emitted for
/// the process lifetime.
#[derive(Debug, Clone)]
pub struct Config {
  /// Path of the append-only events file.
  pub events_file: PathBuf,
  /// Retry count of the enclosing operation, when provided.
  pub current_retry_count: Option<String>,
  /// Correlation id of the enclosing operation, when provided.
  pub parent_correlation_id: Option<String>,
}

impl Config {
  /// Build a configuration with an explicit events file, reading only the
  /// optional context values from the environment.
  pub fn new(events_file: PathBuf) -> Self {
    Self {
      events_file,
      current_retry_count: std::env::var(RETRY_COUNT_ENV).ok(),
      parent_correlation_id: std::env::var(CORRELATION_ID_ENV).ok(),
    }
  }

  /// Read the full configuration from the environment.
  ///
  /// Fails with [`RecorderError::MissingEnv`] when the events file path is
  /// not set; the optional context values default to `None`.
  pub fn from_env() -> Result<Self, RecorderError> {
    let events_file = std::env::var(EVENTS_FILE_ENV).map_err(|_| RecorderError::MissingEnv {
      var: EVENTS_FILE_ENV.to_string(),
    })?;
    Ok(Self::new(PathBuf::from(events_file)))
  }
}
