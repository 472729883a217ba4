//! Chronicle Recorder
//!
//! This crate provides the stateful side of event recording: the [`Session`]
//! state machine that owns the output sink for the lifetime of a recording
//! run, the [`DurationTable`] pairing task starts with completions, and the
//! append-only [`EventSink`] with its custom record separator.
//!
//! A session is opened once at startup ([`Session::open`]), driven by the
//! host adapter through `on_task_start` / `on_task_complete`, and closed
//! exactly once on the engine's run-end signal ([`Session::close`]).

mod config;
mod duration;
mod error;
mod session;
mod sink;

pub use config::{CORRELATION_ID_ENV, Config, EVENTS_FILE_ENV, RETRY_COUNT_ENV};
pub use duration::DurationTable;
pub use error::RecorderError;
pub use session::Session;
pub use sink::{EventSink, RECORD_SEPARATOR};
