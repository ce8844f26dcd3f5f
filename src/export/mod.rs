
use crate::loader::DatasetError;
use crate::record::DatasetRecord;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Indentation used when none is given
pub const DEFAULT_INDENT: usize = 2;

/// Top-level keys starting with this are internal and never exported
pub const RESERVED_PREFIX: &str = "_";

/// Anything that can be exported as a dataset
pub trait DatasetFields {
    /// Top-level fields in output order
    fn fields(&self) -> Option<&Map<String, Value>>;

    /// Bindings with no tree representation, by name
    fn opaque_names(&self) -> Vec<&str> {
        Vec::new()
    }
}

impl DatasetFields for DatasetRecord {
    fn fields(&self) -> Option<&Map<String, Value>> {
        Some(DatasetRecord::fields(self))
    }

    fn opaque_names(&self) -> Vec<&str> {
        self.opaque_fields().iter().map(|o| o.name.as_str()).collect()
    }
}

impl DatasetFields for Map<String, Value> {
    fn fields(&self) -> Option<&Map<String, Value>> {
        Some(self)
    }
}

/// Only objects carry fields; any other tree exports as `{}`
impl DatasetFields for Value {
    fn fields(&self) -> Option<&Map<String, Value>> {
        self.as_object()
    }
}

/// Flat, exportable copy of a dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Export {
    pub fields: Map<String, Value>,
    /// Names left out of `fields`: reserved keys and opaque bindings
    pub dropped: Vec<String>,
}

/// Outcome of [`save_dataset_json`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub path: PathBuf,
    pub written_fields: usize,
    pub dropped: Vec<String>,
}

/// Copy the exportable top-level fields of a dataset
///
/// Reserved-prefix keys and values with no JSON form are left out and
/// listed in [`Export::dropped`]. Order follows the input.
pub fn export_fields(dataset: &impl DatasetFields) -> Export {
    let mut export = Export::default();

    if let Some(fields) = dataset.fields() {
        for (key, value) in fields {
            if key.starts_with(RESERVED_PREFIX) {
                export.dropped.push(key.clone());
                continue;
            }
            export.fields.insert(key.clone(), value.clone());
        }
    }

    export.dropped.extend(
        dataset
            .opaque_names()
            .into_iter()
            .map(str::to_string),
    );
    export
}

/// Render a dataset as pretty JSON with `indent` spaces per level
pub fn to_json_string(dataset: &impl DatasetFields, indent: usize) -> Result<String, DatasetError> {
    let export = export_fields(dataset);
    render(&export.fields, indent)
}

fn render(fields: &Map<String, Value>, indent: usize) -> Result<String, DatasetError> {
    let indent = " ".repeat(indent);
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent.as_bytes()));
    fields.serialize(&mut serializer)?;

    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Write a dataset to `path` as JSON
///
/// Best effort: reserved keys and values without a JSON form are skipped
/// rather than failing the save. Skipped names are logged and returned.
pub fn save_dataset_json(
    dataset: &impl DatasetFields,
    path: impl AsRef<Path>,
    indent: usize,
) -> Result<SaveReport, DatasetError> {
    let path = path.as_ref();
    let export = export_fields(dataset);

    if !export.dropped.is_empty() {
        tracing::debug!(
            path = %path.display(),
            dropped = ?export.dropped,
            "fields left out of json export"
        );
    }

    let text = render(&export.fields, indent)?;
    fs::write(path, text).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(SaveReport {
        path: path.to_path_buf(),
        written_fields: export.fields.len(),
        dropped: export.dropped,
    })
}

/// Exportable fields of a dataset as a plain map
pub fn dataset_to_map(dataset: &impl DatasetFields) -> Map<String, Value> {
    export_fields(dataset).fields
}
