//! Recorder error types.

/// Errors that can occur while recording events.
///
/// All of these are fatal to the recording session: there is no retry and no
/// buffering fallback for an append-only audit stream.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
  /// A required environment variable was not set at startup.
  #[error("missing required environment variable: {var}")]
  MissingEnv { var: String },

  /// The sink could not be opened, written, or closed.
  #[error("event sink i/o error: {0}")]
  Io(#[from] std::io::Error),

  /// An event record could not be serialized.
  #[error("failed to serialize event: {0}")]
  Serialize(#[from] serde_json::Error),
}
