//! # JSON Flattener
//!
//! Turns a secret payload into an ordered list of `path -> value` overrides.
//!
//! The payload is never materialized: a [`DeserializeSeed`] walks the
//! `serde_json` token stream and keeps the current path in a single buffer,
//! pushing a segment when it enters a property or array element and
//! truncating back when it leaves. Output order is document order.
//!
//! Scalar rendering:
//!
//! | JSON             | value                                     |
//! |------------------|-------------------------------------------|
//! | string           | the string                                |
//! | `true` / `false` | `true` / `false`                          |
//! | integer          | exact integer text (`5`)                  |
//! | other number     | shortest `f64` text (`5.5`, `5.0` → `5`)  |
//! | `null`           | nothing emitted                           |
//!
//! Array elements are addressed by index segment (`hosts:0`, `hosts:1`).

use crate::config::DEFAULT_KEY_DELIMITER;
use crate::errors::{ConfigSecretsError, Result};
use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use std::fmt;

/// One resolved setting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlattenedOverride {
    /// Full path, joined with the key delimiter
    pub path: String,
    /// Scalar rendered as a string
    pub value: String,
}

impl FlattenedOverride {
    pub fn new(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self { path: path.into(), value: value.into() }
    }
}

impl<P: Into<String>, V: Into<String>> From<(P, V)> for FlattenedOverride {
    fn from((path, value): (P, V)) -> Self {
        Self::new(path, value)
    }
}

/// Flatten `json` beneath `root_path` using the default `:` delimiter.
pub fn flatten(root_path: &str, json: &str) -> Result<Vec<FlattenedOverride>> {
    flatten_with_delimiter(root_path, json, DEFAULT_KEY_DELIMITER)
}

/// Flatten `json` beneath `root_path`, joining segments with `delimiter`.
///
/// A blank `root_path` means paths start at the top-level field name with no
/// leading delimiter.
///
/// # Errors
///
/// - [`ConfigSecretsError::MalformedSecretPayload`] if `json` does not parse
/// - [`ConfigSecretsError::InvalidMarker`] if a scalar would land on an empty
///   path: a bare scalar payload with no root path, or a top-level `""` key
///   with no root path
pub fn flatten_with_delimiter(
    root_path: &str,
    json: &str,
    delimiter: &str,
) -> Result<Vec<FlattenedOverride>> {
    let root = if root_path.trim().is_empty() { "" } else { root_path };

    let mut state = FlattenState {
        key: root.to_string(),
        delimiter,
        rooted: !root.is_empty(),
        depth: 0,
        orphan_scalar: false,
        out: Vec::new(),
    };

    let mut deserializer = serde_json::Deserializer::from_str(json);
    PathSeed { state: &mut state }
        .deserialize(&mut deserializer)
        .and_then(|()| deserializer.end())
        .map_err(|e| ConfigSecretsError::malformed_payload(root, e))?;

    if state.orphan_scalar {
        return Err(ConfigSecretsError::invalid_marker(
            root,
            "secret payload has a value with no path to hold it",
        ));
    }

    Ok(state.out)
}

struct FlattenState<'a> {
    key: String,
    delimiter: &'a str,
    rooted: bool,
    depth: usize,
    orphan_scalar: bool,
    out: Vec<FlattenedOverride>,
}

impl FlattenState<'_> {
    /// Append a segment, returning the length to truncate back to.
    fn push_segment(&mut self, segment: &str) -> usize {
        let mark = self.key.len();
        // An empty segment still counts as a level.
        if self.rooted || self.depth > 0 {
            self.key.push_str(self.delimiter);
        }
        self.key.push_str(segment);
        self.depth += 1;
        mark
    }

    fn pop_segment(&mut self, mark: usize) {
        self.key.truncate(mark);
        self.depth -= 1;
    }

    fn emit(&mut self, value: String) {
        if self.key.is_empty() {
            self.orphan_scalar = true;
            return;
        }
        self.out.push(FlattenedOverride { path: self.key.clone(), value });
    }
}

struct PathSeed<'s, 'a> {
    state: &'s mut FlattenState<'a>,
}

impl<'de> DeserializeSeed<'de> for PathSeed<'_, '_> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for PathSeed<'_, '_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<(), E> {
        self.state.emit(v.to_string());
        Ok(())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<(), E> {
        self.state.emit(v.to_string());
        Ok(())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<(), E> {
        self.state.emit(v.to_string());
        Ok(())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<(), E> {
        self.state.emit(format_f64(v));
        Ok(())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<(), E> {
        self.state.emit(v.to_owned());
        Ok(())
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<(), E> {
        self.state.emit(v);
        Ok(())
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        while let Some(name) = map.next_key::<String>()? {
            let mark = self.state.push_segment(&name);
            map.next_value_seed(PathSeed { state: &mut *self.state })?;
            self.state.pop_segment(mark);
        }
        Ok(())
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut index = 0usize;
        loop {
            let mark = self.state.push_segment(&index.to_string());
            let element = seq.next_element_seed(PathSeed { state: &mut *self.state })?;
            self.state.pop_segment(mark);
            if element.is_none() {
                return Ok(());
            }
            index += 1;
        }
    }
}

/// Render a JSON number the way the flattener does.
pub(crate) fn format_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        n.to_string()
    } else {
        n.as_f64().map(format_f64).unwrap_or_else(|| n.to_string())
    }
}

/// Shortest round-trip text; integral values drop the fraction.
fn format_f64(v: f64) -> String {
    format!("{}", v)
}
