//! Chronicle Payload
//!
//! This crate provides the structured value model for task result payloads
//! and the two pure transforms applied to a raw result before it is recorded:
//!
//! - [`Sanitizer`] removes internal bookkeeping keys and known noise keys.
//! - [`Truncator`] bounds the size of strings and sequences so a single
//!   oversized result cannot bloat the event stream.
//!
//! Both transforms are stateless and depth-first; they compose as
//! scrub-then-truncate in the recorder.

mod sanitize;
mod truncate;
mod value;

pub use sanitize::{DEFAULT_INTERNAL_PREFIX, NOISE_KEYS, Sanitizer};
pub use truncate::{Limits, Truncator};
pub use value::Payload;
