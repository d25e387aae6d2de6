use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use sweep_core::errors::{ErrorInfo, SweepError};
use sweep_core::ExperimentTemplate;

/// Document name whose contents are merged beneath every experiment.
pub const DEFAULT_DOCUMENT: &str = "DEFAULT";
/// Document name reserved for cluster settings; never expanded.
pub const SLURM_DOCUMENT: &str = "SLURM";

/// Reads a multi-document YAML configuration and returns its experiment templates.
///
/// An empty `selected` keeps every experiment; otherwise only the named ones
/// are returned, in document order.
pub fn load_templates<P: AsRef<Path>>(
    path: P,
    selected: &[String],
) -> Result<Vec<ExperimentTemplate>, SweepError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|err| {
        SweepError::Io(
            ErrorInfo::new("config-read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    tracing::debug!(path = %path.display(), "loading experiment config");
    templates_from_str(&text, selected)
}

/// Parses templates from YAML text; see [`load_templates`].
pub fn templates_from_str(
    text: &str,
    selected: &[String],
) -> Result<Vec<ExperimentTemplate>, SweepError> {
    let documents = parse_documents(text)?;
    let mut defaults = Map::new();
    let mut experiments = Vec::new();
    for (idx, document) in documents.into_iter().enumerate() {
        let Value::Object(map) = document else {
            return Err(SweepError::Serde(
                ErrorInfo::new("config-document", "every YAML document must be a mapping")
                    .with_context("document", idx.to_string()),
            ));
        };
        let role = map.get("name").and_then(Value::as_str).map(str::to_string);
        match role.as_deref() {
            Some(DEFAULT_DOCUMENT) => {
                tracing::debug!(document = idx, "merging defaults document");
                defaults = map;
            }
            Some(SLURM_DOCUMENT) => {
                tracing::debug!(document = idx, "skipping cluster document");
            }
            _ => experiments.push(map),
        }
    }

    for name in selected {
        let known = experiments
            .iter()
            .any(|map| map.get("name").and_then(Value::as_str) == Some(name.as_str()));
        if !known {
            return Err(SweepError::Template(
                ErrorInfo::new(
                    "template-unknown-selection",
                    "selected experiment is not defined in the config",
                )
                .with_context("experiment", name.clone()),
            ));
        }
    }

    let mut templates = Vec::new();
    for experiment in experiments {
        let keep = selected.is_empty()
            || experiment
                .get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| selected.iter().any(|sel| sel == name));
        if !keep {
            continue;
        }
        let mut merged = defaults.clone();
        merge_deep(&mut merged, experiment);
        let template = ExperimentTemplate::from_value(Value::Object(merged))?;
        tracing::debug!(experiment = %template.name, "loaded experiment template");
        templates.push(template);
    }
    Ok(templates)
}

/// Lists the experiment names declared in a config, skipping reserved documents.
pub fn experiment_names(text: &str) -> Result<Vec<String>, SweepError> {
    Ok(parse_documents(text)?
        .iter()
        .filter_map(|doc| doc.get("name").and_then(Value::as_str))
        .filter(|name| *name != DEFAULT_DOCUMENT && *name != SLURM_DOCUMENT)
        .map(str::to_string)
        .collect())
}

fn parse_documents(text: &str) -> Result<Vec<Value>, SweepError> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(document).map_err(|err| {
            SweepError::Serde(ErrorInfo::new("yaml_deserialize", err.to_string()))
        })?;
        if !value.is_null() {
            documents.push(value);
        }
    }
    Ok(documents)
}

/// Overlays `overlay` onto `base`, recursing into mappings present in both.
pub fn merge_deep(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match value {
            Value::Object(incoming) => match base.get_mut(&key) {
                Some(Value::Object(existing)) => merge_deep(existing, incoming),
                _ => {
                    base.insert(key, Value::Object(incoming));
                }
            },
            other => {
                base.insert(key, other);
            }
        }
    }
}
