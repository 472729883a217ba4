//! Event records and the wire envelope.

use chronicle_payload::Payload;
use serde::{Deserialize, Serialize};

use crate::identity::TaskIdentity;

/// Constant event family identifier carried by every envelope.
pub const EVENT_TYPE: &str = "ANSIBLE";

/// Lifecycle status recorded on an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
  Running,
  Ok,
  Failed,
  Skipped,
  Unreachable,
}

/// Whether the event marks a task start (`pre`) or conclusion (`post`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
  Pre,
  Post,
}

/// Terminal statuses a completion notification may carry.
///
/// `RUNNING` is reserved for start events, so completions use this narrower
/// type and convert into [`Status`] when the record is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
  Ok,
  Failed,
  Skipped,
  Unreachable,
}

impl From<CompletionStatus> for Status {
  fn from(status: CompletionStatus) -> Self {
    match status {
      CompletionStatus::Ok => Status::Ok,
      CompletionStatus::Failed => Status::Failed,
      CompletionStatus::Skipped => Status::Skipped,
      CompletionStatus::Unreachable => Status::Unreachable,
    }
  }
}

/// A task conclusion as reported by the orchestration engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutcome {
  /// Identity fields embedded in the engine's result.
  pub identity: TaskIdentity,
  /// How the task concluded.
  pub status: CompletionStatus,
  /// Raw result payload, when the engine supplied one.
  pub result: Option<Payload>,
  /// The task's declared ignore-errors flag (failures only).
  pub ignore_errors: Option<bool>,
}

/// One record of the event stream.
///
/// Field order matches the wire layout: identifying fields first, then the
/// completion-only fields, then the process-scoped context fields. The two
/// context fields are always present on the wire (`null` when unset) while
/// `duration`, `result` and `ignore_errors` are omitted when not applicable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEvent {
  pub status: Status,
  pub playbook: String,
  pub host: String,
  pub host_group: String,
  pub task: String,
  pub action: String,
  pub correlation_id: String,
  pub phase: Phase,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub duration: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub result: Option<Payload>,
  #[serde(rename = "ignore_errors", skip_serializing_if = "Option::is_none")]
  pub ignore_errors: Option<bool>,
  pub parent_correlation_id: Option<String>,
  pub current_retry_count: Option<String>,
}

/// The wire wrapper written to the sink: one JSON object per record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
  #[serde(rename = "eventType")]
  pub event_type: &'static str,
  pub data: TaskEvent,
}

impl Envelope {
  /// Wrap an event record under the constant [`EVENT_TYPE`].
  pub fn new(data: TaskEvent) -> Self {
    Self {
      event_type: EVENT_TYPE,
      data,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pre_event() -> TaskEvent {
    TaskEvent {
      status: Status::Running,
      playbook: "site.yml".to_string(),
      host: "h1".to_string(),
      host_group: "webservers".to_string(),
      task: "Install nginx".to_string(),
      action: "apt".to_string(),
      correlation_id: "h1abc".to_string(),
      phase: Phase::Pre,
      duration: None,
      result: None,
      ignore_errors: None,
      parent_correlation_id: None,
      current_retry_count: None,
    }
  }

  #[test]
  fn test_status_wire_spelling() {
    for (status, expected) in [
      (Status::Running, "\"RUNNING\""),
      (Status::Ok, "\"OK\""),
      (Status::Failed, "\"FAILED\""),
      (Status::Skipped, "\"SKIPPED\""),
      (Status::Unreachable, "\"UNREACHABLE\""),
    ] {
      assert_eq!(serde_json::to_string(&status).unwrap(), expected);
    }
  }

  #[test]
  fn test_phase_wire_spelling() {
    assert_eq!(serde_json::to_string(&Phase::Pre).unwrap(), "\"pre\"");
    assert_eq!(serde_json::to_string(&Phase::Post).unwrap(), "\"post\"");
  }

  #[test]
  fn test_pre_event_omits_completion_fields() {
    let json = serde_json::to_value(pre_event()).unwrap();
    let record = json.as_object().unwrap();
    assert!(!record.contains_key("duration"));
    assert!(!record.contains_key("result"));
    assert!(!record.contains_key("ignore_errors"));
    assert_eq!(record["hostGroup"], "webservers");
    assert_eq!(record["correlationId"], "h1abc");
    // Context fields are always present, null when unset
    assert!(record["parentCorrelationId"].is_null());
    assert!(record["currentRetryCount"].is_null());
  }

  #[test]
  fn test_post_event_carries_completion_fields() {
    let event = TaskEvent {
      status: Status::Failed,
      phase: Phase::Post,
      duration: Some(500),
      result: Some(Payload::from(serde_json::json!({"msg": "boom"}))),
      ignore_errors: Some(false),
      ..pre_event()
    };
    let json = serde_json::to_value(event).unwrap();
    let record = json.as_object().unwrap();
    assert_eq!(record["status"], "FAILED");
    assert_eq!(record["duration"], 500);
    assert_eq!(record["result"]["msg"], "boom");
    assert_eq!(record["ignore_errors"], false);
  }

  #[test]
  fn test_envelope_wraps_event_type() {
    let json = serde_json::to_value(Envelope::new(pre_event())).unwrap();
    assert_eq!(json["eventType"], "ANSIBLE");
    assert_eq!(json["data"]["status"], "RUNNING");
  }

  #[test]
  fn test_completion_status_converts_to_status() {
    assert_eq!(Status::from(CompletionStatus::Ok), Status::Ok);
    assert_eq!(Status::from(CompletionStatus::Unreachable), Status::Unreachable);
  }
}
