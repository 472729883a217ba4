//! Start-time tracking for in-flight tasks.

use std::collections::HashMap;

/// Maps correlation keys to start timestamps (milliseconds since epoch).
///
/// An entry is created when a task starts and consumed exactly once by the
/// matching completion. A key present in the table corresponds to exactly one
/// outstanding task; a completion with no entry yields a duration of zero
/// (the start was never observed, or was already finalized).
#[derive(Debug, Default)]
pub struct DurationTable {
  started: HashMap<String, i64>,
}

impl DurationTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record a task start. A stale entry for the same key is overwritten
  /// (last write wins).
  pub fn begin(&mut self, correlation_id: &str, now_ms: i64) {
    self.started.insert(correlation_id.to_string(), now_ms);
  }

  /// Consume the entry for `correlation_id` and return the elapsed
  /// milliseconds, or 0 when no start was recorded.
  pub fn finish(&mut self, correlation_id: &str, now_ms: i64) -> i64 {
    self
      .started
      .remove(correlation_id)
      .map(|started_ms| now_ms - started_ms)
      .unwrap_or(0)
  }

  /// Number of tasks currently outstanding.
  pub fn in_flight(&self) -> usize {
    self.started.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_finish_returns_elapsed_and_consumes_entry() {
    let mut table = DurationTable::new();
    table.begin("h1abc", 1000);
    assert_eq!(table.in_flight(), 1);
    assert_eq!(table.finish("h1abc", 1500), 500);
    assert_eq!(table.in_flight(), 0);
  }

  #[test]
  fn test_second_finish_for_same_key_is_zero() {
    let mut table = DurationTable::new();
    table.begin("h1abc", 1000);
    assert_eq!(table.finish("h1abc", 1500), 500);
    assert_eq!(table.finish("h1abc", 2000), 0);
  }

  #[test]
  fn test_finish_without_begin_is_zero() {
    let mut table = DurationTable::new();
    assert_eq!(table.finish("never-started", 1500), 0);
  }

  #[test]
  fn test_begin_overwrites_stale_entry() {
    let mut table = DurationTable::new();
    table.begin("h1abc", 1000);
    table.begin("h1abc", 2000);
    assert_eq!(table.finish("h1abc", 2500), 500);
  }

  #[test]
  fn test_concurrent_tasks_tracked_independently() {
    let mut table = DurationTable::new();
    table.begin("h1abc", 1000);
    table.begin("h2abc", 1200);
    assert_eq!(table.finish("h2abc", 1300), 100);
    assert_eq!(table.finish("h1abc", 2000), 1000);
  }

  #[test]
  fn test_same_millisecond_completion_is_zero() {
    let mut table = DurationTable::new();
    table.begin("h1abc", 1000);
    assert_eq!(table.finish("h1abc", 1000), 0);
  }
}
