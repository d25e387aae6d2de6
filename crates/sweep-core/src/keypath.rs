//! Key-path helpers for nested parameter trees.
//!
//! Sweep directives are nested mappings whose leaves are lists of candidate
//! values. [`flatten`] turns such a mapping into an ordered list of
//! [`SweepAxis`] entries, and [`insert_deep`] writes one concrete value back
//! into a nested parameter tree.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{ErrorInfo, SweepError};

/// Ordered sequence of nested keys identifying one parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Creates a key-path from its components.
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// Parses a dotted key-path such as `optimizer.lr`.
    pub fn parse(dotted: &str) -> Self {
        Self::new(dotted.split('.'))
    }

    /// Returns the key components from root to leaf.
    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Renders the key-path with `.` separators.
    pub fn dotted(&self) -> String {
        self.0.join(".")
    }

    fn child(&self, key: &str) -> Self {
        let mut parts = self.0.clone();
        parts.push(key.to_string());
        Self(parts)
    }
}

impl Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}

/// One swept parameter: its key-path and the candidate values in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepAxis {
    /// Location of the parameter inside the nested tree.
    pub path: KeyPath,
    /// Candidate values in declaration order.
    pub values: Vec<Value>,
}

/// Flattens a nested sweep mapping into ordered axes.
///
/// Entries follow the mapping's insertion order, depth first. Every leaf must
/// be a list; any other scalar is rejected because it cannot be swept.
pub fn flatten(tree: &Map<String, Value>) -> Result<Vec<SweepAxis>, SweepError> {
    let mut axes = Vec::new();
    flatten_into(tree, &KeyPath::default(), &mut axes)?;
    Ok(axes)
}

fn flatten_into(
    tree: &Map<String, Value>,
    prefix: &KeyPath,
    axes: &mut Vec<SweepAxis>,
) -> Result<(), SweepError> {
    for (key, value) in tree {
        let path = prefix.child(key);
        match value {
            Value::Object(inner) => flatten_into(inner, &path, axes)?,
            Value::Array(values) => axes.push(SweepAxis {
                path,
                values: values.clone(),
            }),
            other => {
                return Err(SweepError::Directive(
                    ErrorInfo::new(
                        "directive-leaf-not-list",
                        "sweep directive leaves must be lists of candidate values",
                    )
                    .with_context("key_path", path.dotted())
                    .with_context("found", value_kind(other))
                    .with_hint(format!("wrap the value in a list: {}: [{}]", path, other)),
                ))
            }
        }
    }
    Ok(())
}

/// Inserts `value` at `path`, creating intermediate mappings as needed.
///
/// An existing leaf is overwritten. An intermediate slot holding a
/// non-mapping value is a conflict and is reported rather than replaced.
pub fn insert_deep(
    tree: &mut Map<String, Value>,
    path: &KeyPath,
    value: Value,
) -> Result<(), SweepError> {
    let Some((leaf, parents)) = path.parts().split_last() else {
        return Err(SweepError::Directive(ErrorInfo::new(
            "keypath-empty",
            "cannot insert a value at an empty key-path",
        )));
    };
    let mut cursor = tree;
    for (depth, key) in parents.iter().enumerate() {
        let slot = cursor
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        cursor = match slot {
            Value::Object(inner) => inner,
            other => {
                return Err(SweepError::Directive(
                    ErrorInfo::new(
                        "keypath-conflict",
                        "key-path descends through a value that is not a mapping",
                    )
                    .with_context("key_path", path.dotted())
                    .with_context("at", KeyPath::new(&parents[..=depth]).dotted())
                    .with_context("found", value_kind(other)),
                ))
            }
        };
    }
    cursor.insert(leaf.clone(), value);
    Ok(())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
