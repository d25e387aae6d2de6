//! Name synthesis for expanded variants.
//!
//! A suffix is built from one `<key>_<value>` token per swept key-path. Keys
//! are shortened against the whole axis set of a directive so sibling paths
//! never share a token, and values are rendered so that two distinct values
//! never share one either. Within one pass the key set is fixed and value
//! tokens carry no raw `_`, so a suffix maps back to exactly one combination.

use std::collections::HashMap;

use serde_json::Value;
use sweep_core::{ExperimentTemplate, KeyPath};

/// Separator between the experiment name and its first value suffix.
pub const PRIMARY_SEPARATOR: &str = "__";
/// Separator used once a name already carries a suffix.
pub const SECONDARY_SEPARATOR: &str = "_";

const PARENT_WIDTH: usize = 3;
// Prefixes a string that would otherwise render like a number, bool or null.
const LITERAL_MARK: char = '~';

/// Appends a value-derived suffix to the working experiment name.
///
/// The first expansion pass joins with `__`; later passes (for example the
/// grid pass after a list pass) join with `_`. `_nested_dir` is pointed at the
/// declared name so every variant lands beneath the un-suffixed experiment.
pub fn extend_experiment_name(
    mut template: ExperimentTemplate,
    keys: &[String],
    values: &[Value],
) -> ExperimentTemplate {
    let suffix = suffix_for(keys, values);
    let current = template.experiment_name().to_string();
    let separator = if current.contains(PRIMARY_SEPARATOR) {
        SECONDARY_SEPARATOR
    } else {
        PRIMARY_SEPARATOR
    };
    template.experiment_name = Some(format!("{current}{separator}{suffix}"));
    template.nested_dir = Some(template.name.clone());
    template
}

/// Joins one token per (short key, value) pair.
pub fn suffix_for(keys: &[String], values: &[Value]) -> String {
    keys.iter()
        .zip(values)
        .map(|(key, value)| format!("{}_{}", key, sanitize_value(value)))
        .collect::<Vec<_>>()
        .join("_")
}

/// Shortens every key-path of one directive, keeping the results distinct.
///
/// Parents start at three characters and a multi-word leaf collapses to its
/// initials (`optimizer.learning_rate` -> `opt.lr`). Paths whose short forms
/// collide are widened one character at a time and finally fall back to the
/// full dotted path (`model_a.lr` / `model_b.lr`).
pub fn short_keys(paths: &[KeyPath]) -> Vec<String> {
    let mut levels = vec![0usize; paths.len()];
    loop {
        let rendered: Vec<(String, bool)> = paths
            .iter()
            .zip(&levels)
            .map(|(path, level)| key_at(path, *level))
            .collect();
        let mut owners: HashMap<&str, Vec<usize>> = HashMap::new();
        for (idx, (key, _)) in rendered.iter().enumerate() {
            owners.entry(key.as_str()).or_default().push(idx);
        }
        let mut widened = false;
        for group in owners.into_values().filter(|group| group.len() > 1) {
            for idx in group {
                if !rendered[idx].1 {
                    levels[idx] += 1;
                    widened = true;
                }
            }
        }
        if !widened {
            return rendered.into_iter().map(|(key, _)| key).collect();
        }
    }
}

/// Short form of a single key-path, as used when it is the only axis.
pub fn shorten_key(path: &KeyPath) -> String {
    key_at(path, 0).0
}

// Returns the key at `level` and whether it is already the full dotted path.
fn key_at(path: &KeyPath, level: usize) -> (String, bool) {
    let Some((leaf, parents)) = path.parts().split_last() else {
        return (String::new(), true);
    };
    let longest = parents
        .iter()
        .map(|part| part.chars().count())
        .max()
        .unwrap_or(0);
    let width = PARENT_WIDTH + level;
    if level > 0 && width > longest.max(PARENT_WIDTH) {
        return (path.dotted(), true);
    }
    let mut parts: Vec<String> = parents
        .iter()
        .map(|part| part.chars().take(width).collect())
        .collect();
    parts.push(leaf_initials(leaf));
    let key = parts.join(".");
    let full = key == path.dotted();
    (key, full)
}

fn leaf_initials(leaf: &str) -> String {
    let words: Vec<&str> = leaf.split('_').filter(|word| !word.is_empty()).collect();
    if words.len() > 1 {
        words.iter().filter_map(|word| word.chars().next()).collect()
    } else {
        leaf.to_string()
    }
}

/// Renders a value as a filesystem-safe token, distinct for distinct values.
///
/// Numbers, bools and null use their JSON text. Strings keep alphanumerics,
/// `.` and `-`; every other byte is written as `%XX`, and a string that reads
/// like a number, bool or null is prefixed with `~` (`"1"` -> `~1`). Lists
/// render as `[a,b]` and mappings as `{k=v}`.
pub fn sanitize_value(value: &Value) -> String {
    match value {
        Value::String(text) => render_string(text),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(sanitize_value).collect();
            format!("[{}]", inner.join(","))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{}={}", escape(key), sanitize_value(value)))
                .collect();
            format!("{{{}}}", inner.join(","))
        }
        other => other.to_string(),
    }
}

fn render_string(text: &str) -> String {
    if text.is_empty() {
        return LITERAL_MARK.to_string();
    }
    let escaped = escape(text);
    let literal = matches!(
        serde_json::from_str::<Value>(text),
        Ok(Value::Number(_) | Value::Bool(_) | Value::Null)
    );
    if literal {
        format!("{LITERAL_MARK}{escaped}")
    } else {
        escaped
    }
}

fn escape(text: &str) -> String {
    let mut token = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '.' || ch == '-' {
            token.push(ch);
        } else {
            let mut buf = [0u8; 4];
            for byte in ch.encode_utf8(&mut buf).bytes() {
                token.push_str(&format!("%{byte:02X}"));
            }
        }
    }
    token
}
