//! YAML encoding and decoding of configuration artifacts
//!
//! Decoding overlays a document onto an existing model: keys in the document
//! replace the model's values, keys absent from the document keep them, and
//! unknown keys are ignored.

use crate::error::{ExportError, ExportResult};
use crate::exporter::ContainerAgentConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::Value;

/// Render `model` as a YAML document
pub fn encode<T: Serialize>(model: &T) -> ExportResult<Vec<u8>> {
    serde_yaml::to_string(model)
        .map(String::into_bytes)
        .map_err(|e| ExportError::Encode(e.to_string()))
}

/// Render a compose manifest with every port mapping single-quoted
///
/// Unquoted `host:container` pairs with numbers below 60 read as base-60
/// integers under YAML 1.1 parsers.
pub fn encode_compose(model: &ContainerAgentConfig) -> ExportResult<Vec<u8>> {
    let yaml = serde_yaml::to_string(model).map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(quote_port_mappings(&yaml).into_bytes())
}

fn quote_port_mappings(yaml: &str) -> String {
    let mut out = String::with_capacity(yaml.len() + 16);
    for line in yaml.lines() {
        let item = line.trim_start();
        let indent = &line[..line.len() - item.len()];
        match item.strip_prefix("- ") {
            Some(mapping) if is_port_mapping(mapping) => {
                out.push_str(indent);
                out.push_str("- '");
                out.push_str(mapping);
                out.push('\'');
            }
            _ => out.push_str(line),
        }
        out.push('\n');
    }
    out
}

fn is_port_mapping(item: &str) -> bool {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    item.split_once(':')
        .is_some_and(|(host, container)| all_digits(host) && all_digits(container))
}

/// Populate `model` from a YAML document
///
/// The model is only replaced once the whole document has been validated;
/// on error it is left untouched.
pub fn decode<T>(bytes: &[u8], model: &mut T) -> ExportResult<()>
where
    T: Serialize + DeserializeOwned,
{
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(());
    }

    let overlay: Value = serde_yaml::from_slice(bytes)
        .map_err(|e| ExportError::MalformedArtifact(e.to_string()))?;

    match overlay {
        Value::Null => return Ok(()),
        Value::Mapping(_) => {}
        other => {
            return Err(ExportError::MalformedArtifact(format!(
                "expected a mapping at document root, found {}",
                kind_of(&other)
            )))
        }
    }

    let mut merged =
        serde_yaml::to_value(&*model).map_err(|e| ExportError::Encode(e.to_string()))?;
    merge(&mut merged, overlay);

    *model = serde_yaml::from_value(merged)
        .map_err(|e| ExportError::MalformedArtifact(e.to_string()))?;
    Ok(())
}

/// Recursively overlay mappings; any other value replaces the base outright
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
