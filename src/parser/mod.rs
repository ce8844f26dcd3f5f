mod json;
mod legacy;
mod registry;
mod yaml;

#[cfg(test)]
mod tests;

pub use json::JsonParser;
pub use legacy::{LegacyPythonParser, DEFAULT_PYTHON};
pub use registry::ParserRegistry;
pub use yaml::YamlParser;

use crate::format::DatasetFormat;
use crate::loader::DatasetError;
use crate::record::Namespace;
use serde_json::Value;
use std::path::Path;

/// What a parser hands back to the loader
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// Generic tree from a declarative encoding; validated before use
    Tree(Value),
    /// Bound names from the legacy encoding; trusted by convention
    Namespace(Namespace),
}

/// Core trait that all dataset parsers must implement
pub trait TreeParser: Send + Sync {
    /// Encoding this parser understands
    fn format(&self) -> DatasetFormat;

    /// Parse raw file contents
    ///
    /// # Arguments
    /// * `path` - Path the bytes were read from, used in diagnostics
    /// * `bytes` - Raw file contents
    ///
    /// # Returns
    /// A generic tree, or a namespace for the legacy encoding. Syntax errors
    /// from the underlying parser are returned as-is.
    fn parse(&self, path: &Path, bytes: &[u8]) -> Result<Parsed, DatasetError>;
}
