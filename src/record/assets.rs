use serde_json::{Map, Value};

/// Borrowed view over one `ref_videos` element
#[derive(Debug, Clone, Copy)]
pub struct ReferenceAsset<'a> {
    raw: &'a Map<String, Value>,
}

/// Borrowed view over one `dis_videos` element
#[derive(Debug, Clone, Copy)]
pub struct DistortedAsset<'a> {
    raw: &'a Map<String, Value>,
}

/// Subjective ratings of a distorted asset
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpinionScores<'a> {
    /// Plain ratings in rater order (lists and tuples)
    Sequence(&'a [Value]),
    /// Rater identifier -> rating
    Keyed(&'a Map<String, Value>),
}

impl<'a> ReferenceAsset<'a> {
    pub(crate) fn new(raw: &'a Map<String, Value>) -> Self {
        Self { raw }
    }

    pub fn content_id(&self) -> Option<i64> {
        self.raw.get("content_id").and_then(Value::as_i64)
    }

    pub fn content_name(&self) -> Option<&'a str> {
        self.raw.get("content_name").and_then(Value::as_str)
    }

    pub fn path(&self) -> Option<&'a str> {
        self.raw.get("path").and_then(Value::as_str)
    }

    /// The element exactly as it was parsed
    pub fn raw(&self) -> &'a Map<String, Value> {
        self.raw
    }
}

impl<'a> DistortedAsset<'a> {
    pub(crate) fn new(raw: &'a Map<String, Value>) -> Self {
        Self { raw }
    }

    pub fn asset_id(&self) -> Option<i64> {
        self.raw.get("asset_id").and_then(Value::as_i64)
    }

    pub fn content_id(&self) -> Option<i64> {
        self.raw.get("content_id").and_then(Value::as_i64)
    }

    pub fn path(&self) -> Option<&'a str> {
        self.raw.get("path").and_then(Value::as_str)
    }

    /// `None` when `os` is absent or not a collection (only possible on
    /// unvalidated legacy records)
    pub fn opinion_scores(&self) -> Option<OpinionScores<'a>> {
        match self.raw.get("os")? {
            Value::Array(items) => Some(OpinionScores::Sequence(items)),
            Value::Object(map) => Some(OpinionScores::Keyed(map)),
            _ => None,
        }
    }

    pub fn raw(&self) -> &'a Map<String, Value> {
        self.raw
    }
}

impl<'a> OpinionScores<'a> {
    pub fn len(&self) -> usize {
        match self {
            Self::Sequence(items) => items.len(),
            Self::Keyed(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric ratings in source order; non-numeric entries are skipped
    pub fn values(&self) -> Vec<f64> {
        match self {
            Self::Sequence(items) => items.iter().filter_map(Value::as_f64).collect(),
            Self::Keyed(map) => map.values().filter_map(Value::as_f64).collect(),
        }
    }

    /// Score given by a rater; sequences have no rater identifiers
    pub fn by_rater(&self, rater: &str) -> Option<f64> {
        match self {
            Self::Sequence(_) => None,
            Self::Keyed(map) => map.get(rater).and_then(Value::as_f64),
        }
    }
}
