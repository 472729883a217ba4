//! The append-only event sink.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chronicle_event::Envelope;

use crate::error::RecorderError;

/// Literal marker terminating every record.
///
/// Downstream consumers split the stream on this marker, not on newlines:
/// result strings may themselves contain embedded newlines.
pub const RECORD_SEPARATOR: &str = "<~EOL~>\n";

/// Append-only sink for serialized event records.
///
/// Opened once per recording session, appended to in record order, closed
/// exactly once. Writes are buffered; the buffer is flushed on [`close`].
/// A process terminated without the close signal may lose buffered records,
/// which is acceptable for a best-effort audit log.
///
/// [`close`]: EventSink::close
#[derive(Debug)]
pub struct EventSink {
  out: BufWriter<File>,
}

impl EventSink {
  /// Open the sink in append mode, creating the file if needed.
  pub fn open(path: &Path) -> Result<Self, RecorderError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Self {
      out: BufWriter::new(file),
    })
  }

  /// Append one record: the serialized envelope followed by the separator.
  pub fn append(&mut self, envelope: &Envelope) -> Result<(), RecorderError> {
    let record = serde_json::to_string(envelope)?;
    self.out.write_all(record.as_bytes())?;
    self.out.write_all(RECORD_SEPARATOR.as_bytes())?;
    Ok(())
  }

  /// Flush buffered records and close the sink.
  pub fn close(mut self) -> Result<(), RecorderError> {
    self.out.flush()?;
    Ok(())
  }
}
