//! Plan hashing and the on-disk manifest encoding of an [`Expansion`].

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use sweep_core::errors::{ErrorInfo, SweepError};
use sweep_core::ExperimentTemplate;

use crate::expand::Expansion;

const PLAN_DOMAIN: &[u8] = b"sweep-plan/v1";

/// Hashes the input templates into a hex SHA-256 digest.
///
/// Templates are hashed in declaration order with their mapping order intact:
/// swapping two axes changes the emitted job order and therefore the plan.
pub fn plan_hash(templates: &[ExperimentTemplate]) -> Result<String, SweepError> {
    let mut hasher = Sha256::new();
    hasher.update(PLAN_DOMAIN);
    hasher.update((templates.len() as u64).to_le_bytes());
    for template in templates {
        let bytes = serde_json::to_vec(template).map_err(|err| {
            SweepError::Serde(
                ErrorInfo::new("plan-encode", err.to_string())
                    .with_context("experiment", template.name.clone()),
            )
        })?;
        hasher.update((bytes.len() as u64).to_le_bytes());
        hasher.update(&bytes);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

impl Expansion {
    /// Encodes the expansion as JSON with every mapping's keys sorted.
    pub fn to_manifest_bytes(&self) -> Result<Vec<u8>, SweepError> {
        let value = serde_json::to_value(self).map_err(|err| manifest_error("manifest-encode", err))?;
        serde_json::to_vec(&sorted(value)).map_err(|err| manifest_error("manifest-encode", err))
    }

    /// Decodes a manifest written by [`Expansion::to_manifest_bytes`].
    pub fn from_manifest_bytes(bytes: &[u8]) -> Result<Self, SweepError> {
        serde_json::from_slice(bytes).map_err(|err| manifest_error("manifest-decode", err))
    }
}

fn manifest_error(code: &str, err: serde_json::Error) -> SweepError {
    SweepError::Serde(ErrorInfo::new(code, err.to_string()))
}

// Declaration order only matters while expanding; written records are keyed.
fn sorted(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(key, value)| (key, sorted(value)))
                .collect();
            Value::Object(ordered.into_iter().collect::<Map<_, _>>())
        }
        Value::Array(values) => Value::Array(values.into_iter().map(sorted).collect()),
        other => other,
    }
}
