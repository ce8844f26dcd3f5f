mod error;


pub use error::ValidationError;

use serde_json::{Map, Value};
use std::path::Path;

/// Required keys of every `ref_videos` element
pub const REF_VIDEO_FIELDS: [&str; 2] = ["content_id", "path"];

/// Required keys of every `dis_videos` element
pub const DIS_VIDEO_FIELDS: [&str; 4] = ["asset_id", "content_id", "path", "os"];

/// Check a parsed dataset tree against the minimal dataset schema
///
/// Checks run in a fixed order and stop at the first violation:
/// presence of `ref_videos` and `dis_videos`, then each sequence and its
/// elements, then the shape of every `os` collection. Field types beyond
/// these containers are not inspected. A root that is not a mapping has no
/// keys and fails the first check.
///
/// # Arguments
/// * `tree` - Generic tree produced by a declarative parser
/// * `source` - File the tree came from, appended to error messages
pub fn validate(tree: &Value, source: Option<&Path>) -> Result<(), ValidationError> {
    let empty = Map::new();
    validate_fields(tree.as_object().unwrap_or(&empty), source)
}

/// [`validate`] for a root that is already known to be a mapping
pub fn validate_fields(
    root: &Map<String, Value>,
    source: Option<&Path>,
) -> Result<(), ValidationError> {
    check(root).map_err(|e| e.with_source(source))
}

fn check(root: &Map<String, Value>) -> Result<(), ValidationError> {
    let ref_videos = required_root_field(root, "ref_videos")?;
    let dis_videos = required_root_field(root, "dis_videos")?;

    let ref_videos = as_list(ref_videos, "ref_videos")?;
    for (i, entry) in ref_videos.iter().enumerate() {
        require_record(entry, "ref_videos", i, &REF_VIDEO_FIELDS)?;
    }

    let dis_videos = as_list(dis_videos, "dis_videos")?;
    for (i, entry) in dis_videos.iter().enumerate() {
        let record = require_record(entry, "dis_videos", i, &DIS_VIDEO_FIELDS)?;
        check_opinion_scores(&record["os"], i)?;
    }

    Ok(())
}

fn required_root_field<'a>(
    root: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a Value, ValidationError> {
    root.get(field).ok_or_else(|| {
        ValidationError::new(field, format!("Missing required field '{}'", field))
            .with_field(field)
    })
}

fn as_list<'a>(value: &'a Value, field: &str) -> Result<&'a [Value], ValidationError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| ValidationError::new(field, format!("'{}' must be a list", field)))
}

fn require_record<'a>(
    entry: &'a Value,
    list: &str,
    index: usize,
    fields: &[&str],
) -> Result<&'a Map<String, Value>, ValidationError> {
    let location = format!("{}[{}]", list, index);

    let record = entry
        .as_object()
        .ok_or_else(|| ValidationError::new(&location, format!("{} must be a dict", location)))?;

    if let Some(missing) = fields.iter().find(|f| !record.contains_key(**f)) {
        return Err(ValidationError::new(
            &location,
            format!("{} missing required field '{}'", location, missing),
        )
        .with_field(missing));
    }

    Ok(record)
}

// Tuples arrive as sequences, so a sequence or a mapping is all that can pass.
fn check_opinion_scores(os: &Value, index: usize) -> Result<(), ValidationError> {
    match os {
        Value::Array(_) | Value::Object(_) => Ok(()),
        _ => {
            let location = format!("dis_videos[{}]['os']", index);
            Err(ValidationError::new(
                &location,
                format!("{} must be a list, tuple, or dict", location),
            )
            .with_field("os"))
        }
    }
}
