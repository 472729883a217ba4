//! The recording session state machine.

use chrono::Utc;
use tracing::{debug, info};

use chronicle_event::{
  CompletionStatus, Envelope, Phase, Status, TaskEvent, TaskIdentity, TaskOutcome,
};
use chronicle_payload::{Payload, Sanitizer, Truncator};

use crate::config::Config;
use crate::duration::DurationTable;
use crate::error::RecorderError;
use crate::sink::EventSink;

/// One recording session: open sink, duration table, and process context.
///
/// The lifecycle UNINITIALIZED → OPEN → CLOSED is modeled by ownership:
/// [`Session::open`] performs the open transition and [`Session::close`]
/// consumes the session, so emitting after close is unrepresentable. The
/// session is driven synchronously by the host adapter; each operation runs
/// to completion before the next notification arrives, so no locking is
/// needed.
#[derive(Debug)]
pub struct Session {
  sink: EventSink,
  durations: DurationTable,
  sanitizer: Sanitizer,
  truncator: Truncator,
  parent_correlation_id: Option<String>,
  current_retry_count: Option<String>,
}

impl Session {
  /// Open the recording session: open the sink in append mode and capture
  /// the process context once.
  pub fn open(config: Config) -> Result<Self, RecorderError> {
    let sink = EventSink::open(&config.events_file)?;
    info!(
      events_file = %config.events_file.display(),
      "event recording started"
    );
    Ok(Self {
      sink,
      durations: DurationTable::new(),
      sanitizer: Sanitizer::default(),
      truncator: Truncator::default(),
      parent_correlation_id: config.parent_correlation_id,
      current_retry_count: config.current_retry_count,
    })
  }

  /// Record a task start: remember the start time under the correlation key
  /// and emit a `RUNNING`/`pre` event with no duration or result.
  pub fn on_task_start(&mut self, identity: &TaskIdentity) -> Result<(), RecorderError> {
    self.task_started_at(identity, now_ms())
  }

  /// Record a task conclusion: consume the start entry to compute the
  /// duration (0 when the start was never observed), sanitize and truncate
  /// the raw result, and emit a `post` event with the outcome's status.
  pub fn on_task_complete(&mut self, outcome: TaskOutcome) -> Result<(), RecorderError> {
    self.task_completed_at(outcome, now_ms())
  }

  /// Flush and close the sink. The session cannot be reused afterwards.
  pub fn close(self) -> Result<(), RecorderError> {
    info!(in_flight = self.durations.in_flight(), "event recording stopped");
    self.sink.close()
  }

  fn task_started_at(
    &mut self,
    identity: &TaskIdentity,
    now_ms: i64,
  ) -> Result<(), RecorderError> {
    let correlation_id = identity.correlation_id();
    self.durations.begin(&correlation_id, now_ms);
    debug!(
      correlation_id = %correlation_id,
      host = %identity.host,
      task = %identity.task,
      "task_started"
    );

    let event = self.assemble(identity, Status::Running, Phase::Pre, correlation_id);
    self.emit(event)
  }

  fn task_completed_at(
    &mut self,
    outcome: TaskOutcome,
    now_ms: i64,
  ) -> Result<(), RecorderError> {
    let correlation_id = outcome.identity.correlation_id();
    let duration = self.durations.finish(&correlation_id, now_ms);
    let result = outcome.result.as_ref().map(|raw| self.process_result(raw));
    // The flag is recorded for failures only, regardless of what the
    // notification carried.
    let ignore_errors = match outcome.status {
      CompletionStatus::Failed => outcome.ignore_errors,
      _ => None,
    };
    let status = Status::from(outcome.status);
    debug!(
      correlation_id = %correlation_id,
      status = ?status,
      duration_ms = duration,
      "task_concluded"
    );

    let mut event = self.assemble(&outcome.identity, status, Phase::Post, correlation_id);
    event.duration = Some(duration);
    event.result = result;
    event.ignore_errors = ignore_errors;
    self.emit(event)
  }

  /// Scrub internal/noise fields, then bound the result's size.
  fn process_result(&self, raw: &Payload) -> Payload {
    self.truncator.truncate(&self.sanitizer.scrub(raw))
  }

  fn assemble(
    &self,
    identity: &TaskIdentity,
    status: Status,
    phase: Phase,
    correlation_id: String,
  ) -> TaskEvent {
    TaskEvent {
      status,
      playbook: identity.playbook.clone(),
      host: identity.host.clone(),
      host_group: identity.host_group.clone(),
      task: identity.task.clone(),
      action: identity.action.clone(),
      correlation_id,
      phase,
      duration: None,
      result: None,
      ignore_errors: None,
      parent_correlation_id: self.parent_correlation_id.clone(),
      current_retry_count: self.current_retry_count.clone(),
    }
  }

  fn emit(&mut self, event: TaskEvent) -> Result<(), RecorderError> {
    self.sink.append(&Envelope::new(event))
  }
}

fn now_ms() -> i64 {
  Utc::now().timestamp_millis()
}
