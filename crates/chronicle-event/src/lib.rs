//! Chronicle Event
//!
//! This crate contains the event record types written to the event stream:
//! task identity and correlation-key derivation, lifecycle statuses, the
//! per-task [`TaskEvent`] record, and the [`Envelope`] wire wrapper. These
//! are pure serde types; serialization and sink I/O live in the recorder.

mod identity;
mod record;

pub use identity::TaskIdentity;
pub use record::{CompletionStatus, Envelope, EVENT_TYPE, Phase, Status, TaskEvent, TaskOutcome};
