mod assets;


pub use assets::{DistortedAsset, OpinionScores, ReferenceAsset};

use crate::format::DatasetFormat;
use crate::validate::ValidationError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::PathBuf;

/// Top-level names with dedicated accessors on [`DatasetRecord`]
pub const WELL_KNOWN_FIELDS: [&str; 4] = ["dataset_name", "ref_score", "ref_videos", "dis_videos"];

/// A legacy binding whose value has no tree representation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OpaqueField {
    pub name: String,
    pub type_name: String,
}

/// Bound top-level names reported by the legacy loader
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Namespace {
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub opaque: Vec<OpaqueField>,
}

/// Where a record was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSource {
    pub path: PathBuf,
    pub format: DatasetFormat,
    /// Hex SHA-256 of the bytes that were parsed
    pub sha256: String,
}

/// Canonical in-memory dataset description
///
/// Every top-level field of the source is kept under its own name, in
/// source order, with nested containers carried through untouched. The
/// well-known fields get typed accessors; everything else is reachable
/// through [`get`](Self::get) and [`extra_fields`](Self::extra_fields).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetRecord {
    fields: Map<String, Value>,
    opaque: Vec<OpaqueField>,
    source: Option<DatasetSource>,
}

/// Convert a validated tree into a record
///
/// No renaming or coercion happens. Fails only when the root is not a
/// mapping, which [`validate`](crate::validate) already rules out.
pub fn normalize(tree: Value) -> Result<DatasetRecord, ValidationError> {
    match tree {
        Value::Object(fields) => Ok(DatasetRecord::from_fields(fields)),
        other => Err(ValidationError::new(
            "<root>",
            format!("dataset root must be a mapping, found {}", kind_name(&other)),
        )),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

impl DatasetRecord {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            opaque: Vec::new(),
            source: None,
        }
    }

    /// Build a record from a legacy namespace without schema checks
    pub fn from_namespace(namespace: Namespace) -> Self {
        Self {
            fields: namespace.fields,
            opaque: namespace.opaque,
            source: None,
        }
    }

    pub(crate) fn with_source(mut self, source: DatasetSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn dataset_name(&self) -> Option<&str> {
        self.fields.get("dataset_name").and_then(Value::as_str)
    }

    /// Default reference score; integer scores are widened
    pub fn ref_score(&self) -> Option<f64> {
        self.fields.get("ref_score").and_then(Value::as_f64)
    }

    pub fn ref_videos(&self) -> &[Value] {
        self.sequence("ref_videos")
    }

    pub fn dis_videos(&self) -> &[Value] {
        self.sequence("dis_videos")
    }

    fn sequence(&self, name: &str) -> &[Value] {
        self.fields
            .get(name)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Reference assets in order; non-mapping elements are skipped
    pub fn ref_assets(&self) -> impl Iterator<Item = ReferenceAsset<'_>> {
        self.ref_videos()
            .iter()
            .filter_map(Value::as_object)
            .map(ReferenceAsset::new)
    }

    /// Distorted assets in order; non-mapping elements are skipped
    pub fn dis_assets(&self) -> impl Iterator<Item = DistortedAsset<'_>> {
        self.dis_videos()
            .iter()
            .filter_map(Value::as_object)
            .map(DistortedAsset::new)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// All top-level fields in source order
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.fields
    }

    /// Fields other than the well-known ones (format metadata and the like)
    pub fn extra_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .filter(|(k, _)| !WELL_KNOWN_FIELDS.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Legacy bindings that could not be represented as tree values
    pub fn opaque_fields(&self) -> &[OpaqueField] {
        &self.opaque
    }

    pub fn source(&self) -> Option<&DatasetSource> {
        self.source.as_ref()
    }

    /// Distorted `content_id`s with no matching reference asset
    ///
    /// Loading does not enforce this; callers decide whether dangling
    /// references are fatal. Each id is reported once, in first-seen order.
    pub fn dangling_content_ids(&self) -> Vec<i64> {
        let known: HashSet<i64> = self.ref_assets().filter_map(|a| a.content_id()).collect();
        let mut seen = HashSet::new();

        self.dis_assets()
            .filter_map(|a| a.content_id())
            .filter(|id| !known.contains(id) && seen.insert(*id))
            .collect()
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}
