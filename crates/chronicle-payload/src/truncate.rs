//! Recursive size bounding for result payloads.
//!
//! Oversized strings and sequences have their middles replaced with a marker
//! noting how many units were elided. A hysteresis of 10% of the limit avoids
//! rewriting values that are only marginally over it.

use crate::value::Payload;

/// Size limits applied by [`Truncator`].
#[derive(Debug, Clone, Copy)]
pub struct Limits {
  /// Maximum string length, in characters.
  pub max_string_len: usize,
  /// Maximum element count for variable-length sequences.
  pub max_array_len: usize,
}

impl Default for Limits {
  fn default() -> Self {
    Self {
      max_string_len: 1024,
      max_array_len: 26,
    }
  }
}

impl Limits {
  /// True when `excess` is more than 10% of `max` (integer form of
  /// `excess > max / 10`, exact for fractional thresholds like 102.4).
  fn over_threshold(excess: usize, max: usize) -> bool {
    excess * 10 > max
  }
}

/// Rewrites payloads so that no string or variable-length sequence exceeds
/// the configured limits.
///
/// Oversized values keep their first and last half-limit units around a
/// marker recording the excess over the limit. The reported count is the
/// excess over the *maximum*, not over the retained halves, so markers are
/// informational rather than exact. Fixed-arity `Tuple` payloads are never
/// shortened; maps keep every key. Payloads are owned trees, so cyclic input
/// cannot occur and no depth guard is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Truncator {
  limits: Limits,
}

impl Truncator {
  /// Create a truncator with custom limits.
  pub fn new(limits: Limits) -> Self {
    Self { limits }
  }

  /// Return a copy of `value` with every oversized string and sequence
  /// bounded, recursively.
  pub fn truncate(&self, value: &Payload) -> Payload {
    match value {
      Payload::String(s) => Payload::String(self.truncate_string(s)),
      Payload::Seq(items) => self.truncate_seq(items),
      Payload::Tuple(items) => {
        Payload::Tuple(items.iter().map(|item| self.truncate(item)).collect())
      }
      Payload::Map(entries) => Payload::Map(
        entries
          .iter()
          .map(|(key, nested)| (key.clone(), self.truncate(nested)))
          .collect(),
      ),
      other => other.clone(),
    }
  }

  fn truncate_string(&self, s: &str) -> String {
    let max = self.limits.max_string_len;
    let len = s.chars().count();
    let overlimit = len.saturating_sub(max);
    if !Limits::over_threshold(overlimit, max) {
      return s.to_string();
    }

    let half = max / 2;
    let head: String = s.chars().take(half).collect();
    let tail: String = s.chars().skip(len - half).collect();
    format!("{head}...[skipped {overlimit} bytes]...{tail}")
  }

  fn truncate_seq(&self, items: &[Payload]) -> Payload {
    let max = self.limits.max_array_len;
    let overlimit = items.len().saturating_sub(max);
    if !Limits::over_threshold(overlimit, max) {
      return Payload::Seq(items.iter().map(|item| self.truncate(item)).collect());
    }

    let half = max / 2;
    let mut bounded = Vec::with_capacity(half * 2 + 1);
    bounded.extend(items[..half].iter().map(|item| self.truncate(item)));
    bounded.push(Payload::String(format!("[skipped {overlimit} lines]")));
    bounded.extend(items[items.len() - half..].iter().map(|item| self.truncate(item)));
    Payload::Seq(bounded)
  }
}
