use super::{Parsed, TreeParser};
use crate::format::DatasetFormat;
use crate::loader::DatasetError;
use std::path::Path;

/// YAML datasets, converted into the same tree shape as JSON
///
/// Needs the `yaml` cargo feature; without it every parse fails with
/// `MissingDependency` so callers can tell it apart from a syntax error.
pub struct YamlParser;

impl TreeParser for YamlParser {
    fn format(&self) -> DatasetFormat {
        DatasetFormat::Yaml
    }

    #[cfg(feature = "yaml")]
    fn parse(&self, path: &Path, bytes: &[u8]) -> Result<Parsed, DatasetError> {
        tracing::debug!(path = %path.display(), size = bytes.len(), "parsing yaml dataset");
        let document: serde_yaml::Value = serde_yaml::from_slice(bytes)?;
        Ok(Parsed::Tree(convert::into_tree(document)))
    }

    #[cfg(not(feature = "yaml"))]
    fn parse(&self, path: &Path, _bytes: &[u8]) -> Result<Parsed, DatasetError> {
        tracing::debug!(path = %path.display(), "yaml support not compiled in");
        Err(DatasetError::MissingDependency {
            dependency: "YAML support",
            remedy: "Rebuild dataset-loader with the `yaml` feature enabled.".to_string(),
        })
    }
}

#[cfg(feature = "yaml")]
pub(crate) mod convert {
    use serde_json::{Map, Number, Value};
    use serde_yaml::Value as Yaml;

    /// Map a YAML document onto a JSON-compatible tree
    ///
    /// Scalar mapping keys are stringified (`1: 4` becomes `"1": 4`), tags
    /// are dropped, and non-finite floats become null.
    pub(crate) fn into_tree(value: Yaml) -> Value {
        match value {
            Yaml::Null => Value::Null,
            Yaml::Bool(b) => Value::Bool(b),
            Yaml::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::from(i)
                } else if let Some(u) = n.as_u64() {
                    Value::from(u)
                } else {
                    n.as_f64()
                        .and_then(Number::from_f64)
                        .map_or(Value::Null, Value::Number)
                }
            }
            Yaml::String(s) => Value::String(s),
            Yaml::Sequence(items) => Value::Array(items.into_iter().map(into_tree).collect()),
            Yaml::Mapping(mapping) => Value::Object(
                mapping
                    .into_iter()
                    .map(|(k, v)| (key_string(k), into_tree(v)))
                    .collect::<Map<String, Value>>(),
            ),
            Yaml::Tagged(tagged) => into_tree(tagged.value),
        }
    }

    fn key_string(key: Yaml) -> String {
        match key {
            Yaml::String(s) => s,
            Yaml::Number(n) => n.to_string(),
            Yaml::Bool(b) => b.to_string(),
            Yaml::Null => "null".to_string(),
            Yaml::Tagged(tagged) => key_string(tagged.value),
            complex => serde_yaml::to_string(&complex)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_default(),
        }
    }
}
