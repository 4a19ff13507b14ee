//! Layering resolved overrides onto a `config` crate tree.
//!
//! The base configuration is read back as one JSON document, every override
//! is written into it segment by segment, and the result is layered over the
//! base as a single [`Source`]. Index segments land in arrays the base
//! already holds; a new container whose first segment is `0` becomes an
//! array, anything else becomes a table. Tables are deep merged by `config`,
//! arrays are replaced whole, so static array elements survive next to the
//! secret-backed ones.

use crate::errors::{ConfigSecretsError, Result};
use config::{Config, ConfigError, Map, Source, Value as ConfigValue, ValueKind};
use serde_json::Value;
use std::fmt;

/// Merged configuration table, layered last.
#[derive(Clone)]
struct OverrideSource {
    table: Map<String, ConfigValue>,
}

// Values are secret material.
impl fmt::Debug for OverrideSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverrideSource").field("keys", &self.table.keys().collect::<Vec<_>>()).finish()
    }
}

impl Source for OverrideSource {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> std::result::Result<Map<String, ConfigValue>, ConfigError> {
        Ok(self.table.clone())
    }
}

/// Layer `overrides` over `base`, splitting paths on `delimiter`.
///
/// # Errors
///
/// [`ConfigSecretsError::Config`] if a path has a segment `config` cannot
/// address (empty, or containing `.`, `[` or `]`).
pub(crate) fn merge_overrides<'a, I>(base: Config, overrides: I, delimiter: &str) -> Result<Config>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut tree: Value = base.clone().try_deserialize()?;
    if !tree.is_object() {
        tree = Value::Object(serde_json::Map::new());
    }

    for (path, value) in overrides {
        let segments = split_path(path, delimiter)?;
        apply_override(&mut tree, &segments, value);
    }

    let table = match into_config_value(tree).kind {
        ValueKind::Table(table) => table,
        _ => Map::new(),
    };

    Ok(Config::builder().add_source(base).add_source(OverrideSource { table }).build()?)
}

fn split_path<'p>(path: &'p str, delimiter: &str) -> Result<Vec<&'p str>> {
    let segments: Vec<&str> =
        if delimiter.is_empty() { vec![path] } else { path.split(delimiter).collect() };

    for segment in &segments {
        if segment.is_empty() || segment.contains(['.', '[', ']']) {
            return Err(ConfigSecretsError::config(format!(
                "Override '{}' cannot be merged: segment '{}' is not addressable as a configuration key",
                path, segment
            )));
        }
    }

    Ok(segments)
}

fn apply_override(root: &mut Value, segments: &[&str], value: &str) {
    let mut node = root;
    for segment in segments {
        node = child_mut(node, segment);
    }
    *node = Value::String(value.to_string());
}

/// Child of `node` at `segment`, reshaping `node` into a container if it is
/// not one that can hold the segment.
fn child_mut<'a>(node: &'a mut Value, segment: &str) -> &'a mut Value {
    let index = segment.parse::<usize>().ok();

    match (node, index) {
        (Value::Array(items), Some(i)) => {
            if items.len() <= i {
                items.resize(i + 1, Value::Null);
            }
            &mut items[i]
        }
        (Value::Object(map), _) => {
            let wanted = segment.to_lowercase();
            let key = map
                .keys()
                .find(|k| k.to_lowercase() == wanted)
                .cloned()
                .unwrap_or_else(|| segment.to_string());
            map.entry(key).or_insert(Value::Null)
        }
        (other, index) => {
            *other = if index == Some(0) {
                Value::Array(Vec::new())
            } else {
                Value::Object(serde_json::Map::new())
            };
            child_mut(other, segment)
        }
    }
}

fn into_config_value(value: Value) -> ConfigValue {
    let kind = match value {
        Value::Null => ValueKind::Nil,
        Value::Bool(b) => ValueKind::Boolean(b),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => ValueKind::I64(i),
            (None, Some(u)) => ValueKind::U64(u),
            _ => ValueKind::Float(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => ValueKind::String(s),
        Value::Array(items) => ValueKind::Array(items.into_iter().map(into_config_value).collect()),
        Value::Object(map) => {
            ValueKind::Table(map.into_iter().map(|(k, v)| (k, into_config_value(v))).collect())
        }
    };
    ConfigValue::new(None, kind)
}
