//! Removal of internal bookkeeping and noise keys from raw results.

use crate::value::Payload;

/// Keys dropped from the top level of a result. Nested occurrences survive.
pub const NOISE_KEYS: [&str; 3] = ["invocation", "diff", "exception"];

/// Default marker prefix for the engine's internal bookkeeping keys.
pub const DEFAULT_INTERNAL_PREFIX: &str = "_ansible_";

/// Strips internal and noise keys from a raw result payload.
///
/// Internal keys (those starting with the configured prefix) are removed from
/// the top-level map and from every nested map value. The fixed [`NOISE_KEYS`]
/// are removed from the top level only. The input is never mutated and
/// non-map payloads pass through unchanged.
#[derive(Debug, Clone)]
pub struct Sanitizer {
  internal_prefix: String,
}

impl Default for Sanitizer {
  fn default() -> Self {
    Self::new(DEFAULT_INTERNAL_PREFIX)
  }
}

impl Sanitizer {
  /// Create a sanitizer with a custom internal-key prefix.
  pub fn new(internal_prefix: impl Into<String>) -> Self {
    Self {
      internal_prefix: internal_prefix.into(),
    }
  }

  /// Return a copy of `result` with internal and top-level noise keys removed.
  pub fn scrub(&self, result: &Payload) -> Payload {
    match self.strip_internal(result) {
      Payload::Map(entries) => Payload::Map(
        entries
          .into_iter()
          .filter(|(key, _)| !NOISE_KEYS.contains(&key.as_str()))
          .collect(),
      ),
      other => other,
    }
  }

  /// Remove prefix-marked keys, descending into nested map values only.
  /// Maps inside sequences are left as-is.
  fn strip_internal(&self, value: &Payload) -> Payload {
    match value {
      Payload::Map(entries) => Payload::Map(
        entries
          .iter()
          .filter(|(key, _)| !key.starts_with(&self.internal_prefix))
          .map(|(key, nested)| (key.clone(), self.strip_internal(nested)))
          .collect(),
      ),
      other => other.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn payload(value: serde_json::Value) -> Payload {
    Payload::from(value)
  }

  #[test]
  fn test_strips_internal_keys_at_top_level() {
    let result = payload(json!({
      "_ansible_no_log": false,
      "msg": "ok",
    }));
    let scrubbed = Sanitizer::default().scrub(&result);
    assert!(scrubbed.get("_ansible_no_log").is_none());
    assert_eq!(scrubbed.get("msg").and_then(Payload::as_str), Some("ok"));
  }

  #[test]
  fn test_strips_internal_keys_in_nested_maps() {
    let result = payload(json!({
      "outer": {
        "_ansible_parsed": true,
        "inner": { "_ansible_verbose": 1, "kept": "yes" },
      },
    }));
    let scrubbed = Sanitizer::default().scrub(&result);
    let outer = scrubbed.get("outer").unwrap();
    assert!(outer.get("_ansible_parsed").is_none());
    let inner = outer.get("inner").unwrap();
    assert!(inner.get("_ansible_verbose").is_none());
    assert_eq!(inner.get("kept").and_then(Payload::as_str), Some("yes"));
  }

  #[test]
  fn test_does_not_descend_into_sequences() {
    let result = payload(json!({
      "results": [{ "_ansible_item_label": "x", "rc": 0 }],
    }));
    let scrubbed = Sanitizer::default().scrub(&result);
    let Some(Payload::Seq(items)) = scrubbed.get("results") else {
      panic!("expected a sequence");
    };
    assert!(items[0].get("_ansible_item_label").is_some());
  }

  #[test]
  fn test_noise_keys_removed_at_top_level_only() {
    let result = payload(json!({
      "invocation": { "module_args": {} },
      "diff": [],
      "exception": "trace",
      "nested": { "invocation": "survives" },
    }));
    let scrubbed = Sanitizer::default().scrub(&result);
    assert!(scrubbed.get("invocation").is_none());
    assert!(scrubbed.get("diff").is_none());
    assert!(scrubbed.get("exception").is_none());
    assert_eq!(
      scrubbed
        .get("nested")
        .and_then(|n| n.get("invocation"))
        .and_then(Payload::as_str),
      Some("survives")
    );
  }

  #[test]
  fn test_input_is_not_mutated() {
    let result = payload(json!({ "_ansible_no_log": false, "msg": "ok" }));
    let before = result.clone();
    let _ = Sanitizer::default().scrub(&result);
    assert_eq!(result, before);
  }

  #[test]
  fn test_custom_prefix() {
    let result = payload(json!({ "_private_x": 1, "_ansible_y": 2 }));
    let scrubbed = Sanitizer::new("_private_").scrub(&result);
    assert!(scrubbed.get("_private_x").is_none());
    assert!(scrubbed.get("_ansible_y").is_some());
  }

  #[test]
  fn test_non_map_passes_through() {
    let result = payload(json!("just a string"));
    assert_eq!(Sanitizer::default().scrub(&result), result);
  }

  #[test]
  fn test_absent_keys_are_noops() {
    let result = payload(json!({ "msg": "ok" }));
    assert_eq!(Sanitizer::default().scrub(&result), result);
  }
}
