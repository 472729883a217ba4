//! Task identity and correlation-key derivation.

use serde::{Deserialize, Serialize};

/// Identifies one (host, task) execution instance.
///
/// The same identity fields arrive with both the start notification and the
/// completion notification; the engine guarantees `task_id` is stable across
/// the two and unique per execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskIdentity {
  /// Playbook the task belongs to.
  pub playbook: String,
  /// Host the task ran on.
  pub host: String,
  /// Host group (play name) the host belongs to.
  pub host_group: String,
  /// Human-readable task name.
  pub task: String,
  /// Action (module) the task invokes.
  pub action: String,
  /// Engine-assigned per-execution task id.
  pub task_id: String,
}

impl TaskIdentity {
  /// Derive the correlation key pairing a start event with its completion.
  ///
  /// Host and task id concatenated: distinguishes concurrent tasks on
  /// different hosts and different tasks on one host.
  pub fn correlation_id(&self) -> String {
    format!("{}{}", self.host, self.task_id)
  }
}
