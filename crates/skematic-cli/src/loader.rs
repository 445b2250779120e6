//! # Document Loader
//!
//! Reads schema and sample files from disk into decoded
//! `serde_json::Value` trees. Format is dispatched on the file extension:
//! `.yaml`/`.yml` parse as YAML and convert to the JSON-compatible subset,
//! everything else parses as JSON. This is the boundary where hard
//! failures are allowed — undecodable input is a `SkematicError`, never a
//! validation outcome.

use std::path::{Path, PathBuf};

use serde_json::Value;

use skematic_core::SkematicError;

/// Load one document, dispatching on the file extension.
pub fn load_document(path: &Path) -> Result<Value, SkematicError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| SkematicError::DocumentLoad {
            path: path.display().to_string(),
            reason: format!("cannot read file: {e}"),
        })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    match extension {
        "yaml" | "yml" => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(&content).map_err(|e| SkematicError::DocumentLoad {
                    path: path.display().to_string(),
                    reason: format!("invalid YAML: {e}"),
                })?;
            yaml_to_json(&yaml).map_err(|reason| SkematicError::DocumentLoad {
                path: path.display().to_string(),
                reason,
            })
        }
        _ => serde_json::from_str(&content).map_err(|e| SkematicError::DocumentLoad {
            path: path.display().to_string(),
            reason: format!("invalid JSON: {e}"),
        }),
    }
}

/// Load a sample corpus. A single file whose top level is an array
/// contributes one sample per element; with multiple files, each file is
/// one sample.
pub fn load_samples(paths: &[PathBuf]) -> Result<Vec<Value>, SkematicError> {
    let mut samples = Vec::new();
    for path in paths {
        let document = load_document(path)?;
        match document {
            Value::Array(items) if paths.len() == 1 => samples.extend(items),
            other => samples.push(other),
        }
    }
    Ok(samples)
}

/// Convert a YAML value tree into the equivalent JSON tree.
///
/// YAML's richer surface (tags, non-string keys) is folded into the
/// JSON-compatible subset: tags are ignored, non-string keys are
/// stringified, and floats JSON cannot represent are rejected.
fn yaml_to_json(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (key, value) in map {
                let key = match key {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                json_map.insert(key, yaml_to_json(value)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}
