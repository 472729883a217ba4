//! The structured value model for task results.
//!
//! Results arrive from the orchestration engine as JSON; the boundary decodes
//! them into [`Payload`], a closed sum type, so the scrubbing and truncation
//! passes can match on shape instead of inspecting runtime types. Map entries
//! keep their document order all the way to the wire.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

/// A structured task result value.
///
/// `Seq` is a variable-length sequence and is subject to size bounding.
/// `Tuple` is a fixed-arity sequence: its elements are transformed in place
/// but the sequence itself is never shortened. JSON decoding only ever
/// produces `Seq`; `Tuple` exists for callers that assemble payloads
/// directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
  Null,
  Bool(bool),
  Number(serde_json::Number),
  String(String),
  Seq(Vec<Payload>),
  Tuple(Vec<Payload>),
  Map(Vec<(String, Payload)>),
}

impl Payload {
  /// Look up a top-level map entry by key. `None` for non-map payloads.
  pub fn get(&self, key: &str) -> Option<&Payload> {
    match self {
      Payload::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
      _ => None,
    }
  }

  /// The string content, if this is a string payload.
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Payload::String(s) => Some(s),
      _ => None,
    }
  }
}

impl From<serde_json::Value> for Payload {
  fn from(value: serde_json::Value) -> Self {
    match value {
      serde_json::Value::Null => Payload::Null,
      serde_json::Value::Bool(b) => Payload::Bool(b),
      serde_json::Value::Number(n) => Payload::Number(n),
      serde_json::Value::String(s) => Payload::String(s),
      serde_json::Value::Array(items) => {
        Payload::Seq(items.into_iter().map(Payload::from).collect())
      }
      serde_json::Value::Object(map) => {
        Payload::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
      }
    }
  }
}

impl Serialize for Payload {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    match self {
      Payload::Null => serializer.serialize_unit(),
      Payload::Bool(b) => serializer.serialize_bool(*b),
      Payload::Number(n) => n.serialize(serializer),
      Payload::String(s) => serializer.serialize_str(s),
      // Both sequence flavors are plain JSON arrays on the wire
      Payload::Seq(items) | Payload::Tuple(items) => {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
          seq.serialize_element(item)?;
        }
        seq.end()
      }
      Payload::Map(entries) => {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
          map.serialize_entry(key, value)?;
        }
        map.end()
      }
    }
  }
}

impl<'de> Deserialize<'de> for Payload {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    struct PayloadVisitor;

    impl<'de> Visitor<'de> for PayloadVisitor {
      type Value = Payload;

      fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON value")
      }

      fn visit_bool<E>(self, v: bool) -> Result<Payload, E>
      where
        E: de::Error,
      {
        Ok(Payload::Bool(v))
      }

      fn visit_i64<E>(self, v: i64) -> Result<Payload, E>
      where
        E: de::Error,
      {
        Ok(Payload::Number(v.into()))
      }

      fn visit_u64<E>(self, v: u64) -> Result<Payload, E>
      where
        E: de::Error,
      {
        Ok(Payload::Number(v.into()))
      }

      fn visit_f64<E>(self, v: f64) -> Result<Payload, E>
      where
        E: de::Error,
      {
        Ok(
          serde_json::Number::from_f64(v)
            .map(Payload::Number)
            .unwrap_or(Payload::Null),
        )
      }

      fn visit_str<E>(self, v: &str) -> Result<Payload, E>
      where
        E: de::Error,
      {
        Ok(Payload::String(v.to_string()))
      }

      fn visit_string<E>(self, v: String) -> Result<Payload, E>
      where
        E: de::Error,
      {
        Ok(Payload::String(v))
      }

      fn visit_unit<E>(self) -> Result<Payload, E>
      where
        E: de::Error,
      {
        Ok(Payload::Null)
      }

      fn visit_none<E>(self) -> Result<Payload, E>
      where
        E: de::Error,
      {
        Ok(Payload::Null)
      }

      fn visit_some<D>(self, deserializer: D) -> Result<Payload, D::Error>
      where
        D: Deserializer<'de>,
      {
        Deserialize::deserialize(deserializer)
      }

      fn visit_seq<A>(self, mut seq: A) -> Result<Payload, A::Error>
      where
        A: SeqAccess<'de>,
      {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
          items.push(item);
        }
        Ok(Payload::Seq(items))
      }

      fn visit_map<A>(self, mut map: A) -> Result<Payload, A::Error>
      where
        A: MapAccess<'de>,
      {
        // Entries are collected in document order
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry()? {
          entries.push(entry);
        }
        Ok(Payload::Map(entries))
      }
    }

    deserializer.deserialize_any(PayloadVisitor)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_deserialize_preserves_map_order() {
    let payload: Payload =
      serde_json::from_str(r#"{"zebra": 1, "apple": 2, "mango": 3}"#).unwrap();
    let Payload::Map(entries) = payload else {
      panic!("expected a map");
    };
    let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["zebra", "apple", "mango"]);
  }

  #[test]
  fn test_serialize_round_trip() {
    let input = r#"{"msg":"ok","changed":false,"rc":0,"lines":["a","b"]}"#;
    let payload: Payload = serde_json::from_str(input).unwrap();
    assert_eq!(serde_json::to_string(&payload).unwrap(), input);
  }

  #[test]
  fn test_tuple_serializes_as_array() {
    let payload = Payload::Tuple(vec![
      Payload::String("a".to_string()),
      Payload::Number(1.into()),
    ]);
    assert_eq!(serde_json::to_string(&payload).unwrap(), r#"["a",1]"#);
  }

  #[test]
  fn test_get_on_map() {
    let payload = Payload::from(serde_json::json!({"msg": "ok"}));
    assert_eq!(payload.get("msg").and_then(Payload::as_str), Some("ok"));
    assert!(payload.get("missing").is_none());
    assert!(Payload::Null.get("msg").is_none());
  }
}
