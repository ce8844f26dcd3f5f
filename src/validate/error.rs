use std::path::{Path, PathBuf};
use thiserror::Error;

/// A dataset tree failed a structural check
///
/// `location` names the offending field or element (e.g. `dis_videos[0]`)
/// and `field` the missing or malformed key when there is one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}{}", in_source(.source_path.as_deref()))]
pub struct ValidationError {
    pub message: String,
    pub location: String,
    pub field: Option<String>,
    pub source_path: Option<PathBuf>,
}

impl ValidationError {
    pub(crate) fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: location.into(),
            field: None,
            source_path: None,
        }
    }

    pub(crate) fn with_field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    pub(crate) fn with_source(mut self, source: Option<&Path>) -> Self {
        self.source_path = source.map(Path::to_path_buf);
        self
    }
}

fn in_source(source: Option<&Path>) -> String {
    source
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}
