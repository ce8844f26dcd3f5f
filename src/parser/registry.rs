use super::{JsonParser, LegacyPythonParser, TreeParser, YamlParser};
use crate::format::DatasetFormat;
use crate::loader::DatasetError;
use std::collections::HashMap;
use std::path::Path;

/// Dispatch table from dataset format to parser
pub struct ParserRegistry {
    map: HashMap<DatasetFormat, Box<dyn TreeParser>>,
}

impl ParserRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Registry with the JSON, YAML and legacy Python parsers
    ///
    /// # Arguments
    /// * `python` - Interpreter used to execute legacy `.py` datasets
    pub fn with_defaults(python: impl Into<String>) -> Self {
        let mut registry = Self::new();
        registry.register(JsonParser);
        registry.register(YamlParser);
        registry.register(LegacyPythonParser::new(python));
        registry
    }

    /// Register a parser under the format it reports, replacing any previous one
    pub fn register(&mut self, parser: impl TreeParser + 'static) {
        self.map.insert(parser.format(), Box::new(parser));
    }

    pub fn get(&self, format: DatasetFormat) -> Option<&dyn TreeParser> {
        self.map.get(&format).map(|p| &**p)
    }

    /// Select the parser for a file path by its extension
    ///
    /// Fails with `UnsupportedFormat` when the extension is unknown or no
    /// parser is registered for its format.
    pub fn select(&self, path: &Path) -> Result<&dyn TreeParser, DatasetError> {
        let format = DatasetFormat::from_path(path)?;
        self.get(format).ok_or_else(|| DatasetError::UnsupportedFormat {
            extension: format!(".{}", format.extensions()[0]),
            supported: self.registered_extensions().join(", "),
        })
    }

    /// Get the number of registered parsers
    pub fn parser_count(&self) -> usize {
        self.map.len()
    }

    /// Extensions (with dot) of every registered format, in canonical order
    pub fn registered_extensions(&self) -> Vec<String> {
        DatasetFormat::ALL
            .iter()
            .filter(|f| self.map.contains_key(f))
            .flat_map(|f| f.extensions().iter().map(|e| format!(".{}", e)))
            .collect()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults(super::DEFAULT_PYTHON)
    }
}
