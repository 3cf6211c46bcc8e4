use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::LoadError;

/// An ordered, string-keyed mapping of arbitrary document values.
pub type Mapping = serde_json::Map<String, Value>;

/// Operations of a single path, keyed by HTTP method in document order.
pub type OperationsBlock = Mapping;

/// Reusable definitions referenced from operations.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Components {
    #[serde(default, deserialize_with = "null_as_default")]
    pub schemas: Mapping,

    #[serde(rename = "requestBodies", default, deserialize_with = "null_as_default")]
    pub request_bodies: Mapping,
}

/// Root of a parsed OpenAPI document. Only `paths` and `components` are
/// retained; every other top-level key is ignored.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SpecDocument {
    #[serde(default, deserialize_with = "deserialize_paths")]
    pub paths: IndexMap<String, OperationsBlock>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub components: Components,
}

/// Parse a document from YAML. Merge keys (`<<: *anchor`) are applied
/// before the document is read.
pub fn from_yaml(input: &str) -> Result<SpecDocument, LoadError> {
    let mut value: serde_yaml_ng::Value = serde_yaml_ng::from_str(input)?;
    value.apply_merge()?;
    Ok(serde_yaml_ng::from_value(stringify_keys(value))?)
}

/// Parse a document from JSON.
pub fn from_json(input: &str) -> Result<SpecDocument, LoadError> {
    Ok(serde_json::from_str(input)?)
}

/// Read and parse a document from disk. Files with a `.json` extension are
/// parsed as JSON, everything else as YAML.
pub fn from_path(path: &Path) -> Result<SpecDocument, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let document = if is_json {
        from_json(&content)?
    } else {
        from_yaml(&content)?
    };

    log::debug!(
        "loaded {} ({} paths, {} request bodies, {} schemas)",
        path.display(),
        document.paths.len(),
        document.components.request_bodies.len(),
        document.components.schemas.len()
    );
    Ok(document)
}

// Unquoted keys such as `200:` parse as numbers; document mappings are keyed
// by string.
fn stringify_keys(value: serde_yaml_ng::Value) -> serde_yaml_ng::Value {
    use serde_yaml_ng::Value as Yaml;

    match value {
        Yaml::Mapping(mapping) => Yaml::Mapping(
            mapping
                .into_iter()
                .map(|(key, value)| {
                    let key = match key {
                        Yaml::Number(n) => Yaml::String(n.to_string()),
                        Yaml::Bool(b) => Yaml::String(b.to_string()),
                        other => other,
                    };
                    (key, stringify_keys(value))
                })
                .collect(),
        ),
        Yaml::Sequence(items) => Yaml::Sequence(items.into_iter().map(stringify_keys).collect()),
        other => other,
    }
}

/// Shared empty mapping returned by accessors when nothing is found.
pub(crate) fn empty_mapping() -> &'static Mapping {
    static EMPTY: LazyLock<Mapping> = LazyLock::new(Mapping::new);
    &EMPTY
}

/// Human-readable name of a value's variant, used in error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

// `paths:` with no value, or a path with no operations, is empty rather than
// a type error.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_paths<'de, D>(deserializer: D) -> Result<IndexMap<String, OperationsBlock>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<IndexMap<String, Option<OperationsBlock>>> =
        Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(path, operations)| (path, operations.unwrap_or_default()))
        .collect())
}
