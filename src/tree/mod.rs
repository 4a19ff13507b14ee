//! # Configuration Tree
//!
//! The resolver reads configuration through [`ConfigSection`], a read-only
//! view of one section of a hierarchical configuration: its key, its full
//! path, an optional scalar value, and its children in order.
//!
//! [`ConfigTree`] is the owned implementation shipped with the crate. It can
//! be built from flat `path -> value` pairs, from a JSON document, or from a
//! loaded [`config::Config`].

use crate::errors::Result;
use crate::flatten::format_number;
use indexmap::IndexMap;
use serde_json::Value;

/// Read-only view of one configuration section.
pub trait ConfigSection {
    /// Last path segment. Empty for the root.
    fn key(&self) -> &str;

    /// Full path from the root. Empty for the root.
    fn path(&self) -> &str;

    /// Scalar value held by this section, if any.
    fn value(&self) -> Option<&str>;

    /// Child sections in insertion order.
    fn children(&self) -> impl Iterator<Item = &Self>;
}

/// Owned configuration tree.
///
/// Child keys are matched case-insensitively on insert and lookup; the first
/// casing seen for a key is the one kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTree {
    key: String,
    path: String,
    value: Option<String>,
    delimiter: String,
    children: IndexMap<String, ConfigTree>,
}

impl ConfigTree {
    /// Empty root section.
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            key: String::new(),
            path: String::new(),
            value: None,
            delimiter: delimiter.into(),
            children: IndexMap::new(),
        }
    }

    /// Build a tree from flat `path -> value` pairs split on `delimiter`.
    pub fn from_pairs<I, K, V>(delimiter: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut tree = Self::new(delimiter);
        for (path, value) in pairs {
            tree.insert(path.as_ref(), value);
        }
        tree
    }

    /// Build a tree from a JSON document.
    ///
    /// Objects become sections, array elements become sections keyed by
    /// index, scalars become values and `null` leaves no value.
    pub fn from_json(delimiter: &str, json: &Value) -> Self {
        let mut tree = Self::new(delimiter);
        tree.absorb_json(json);
        tree
    }

    /// Build a tree from a loaded [`config::Config`].
    pub fn from_config(delimiter: &str, config: &config::Config) -> Result<Self> {
        let json: Value = config.clone().try_deserialize()?;
        Ok(Self::from_json(delimiter, &json))
    }

    /// Delimiter used to join path segments.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Set the value at `path`, creating intermediate sections.
    pub fn insert(&mut self, path: &str, value: impl Into<String>) {
        let delimiter = self.delimiter.clone();
        let mut section = self;
        for segment in path.split(delimiter.as_str()) {
            section = section.child_entry(segment);
        }
        section.value = Some(value.into());
    }

    /// Section at `path`, matched case-insensitively.
    pub fn section(&self, path: &str) -> Option<&ConfigTree> {
        path.split(self.delimiter.as_str())
            .try_fold(self, |section, segment| section.children.get(&segment.to_lowercase()))
    }

    /// Value at `path`, matched case-insensitively.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.section(path).and_then(|s| s.value.as_deref())
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.value.is_none()
    }

    fn child_entry(&mut self, key: &str) -> &mut ConfigTree {
        let path = if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}{}{}", self.path, self.delimiter, key)
        };
        let delimiter = self.delimiter.clone();

        self.children.entry(key.to_lowercase()).or_insert_with(|| ConfigTree {
            key: key.to_string(),
            path,
            value: None,
            delimiter,
            children: IndexMap::new(),
        })
    }

    fn absorb_json(&mut self, json: &Value) {
        match json {
            Value::Null => {}
            Value::Bool(b) => self.value = Some(b.to_string()),
            Value::Number(n) => self.value = Some(format_number(n)),
            Value::String(s) => self.value = Some(s.clone()),
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.child_entry(&index.to_string()).absorb_json(item);
                }
            }
            Value::Object(map) => {
                for (key, item) in map {
                    self.child_entry(key).absorb_json(item);
                }
            }
        }
    }
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_KEY_DELIMITER)
    }
}

impl ConfigSection for ConfigTree {
    fn key(&self) -> &str {
        &self.key
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn children(&self) -> impl Iterator<Item = &Self> {
        self.children.values()
    }
}
