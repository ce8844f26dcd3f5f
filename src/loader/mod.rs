mod config;
mod error;


pub use config::{LoaderConfig, DEFAULT_MAX_FILE_SIZE};
pub use error::DatasetError;

use crate::format::DatasetFormat;
use crate::parser::{Parsed, ParserRegistry, TreeParser};
use crate::record::{normalize, DatasetRecord, DatasetSource};
use crate::validate::{validate, validate_fields};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Label used in messages for datasets parsed from memory
const MEMORY_SOURCE: &str = "<memory>";

/// Detects, parses, validates and normalizes dataset files
///
/// Each call is an independent open-read-parse-close cycle; the loader
/// holds no state between calls and can be shared across threads.
pub struct DatasetLoader {
    registry: ParserRegistry,
    config: LoaderConfig,
}

impl DatasetLoader {
    pub fn new(config: LoaderConfig) -> Self {
        let registry = ParserRegistry::with_defaults(config.python.clone());
        Self { registry, config }
    }

    /// Loader configured from `DATASET_LOADER_*` environment variables
    pub fn from_env() -> Self {
        Self::new(LoaderConfig::from_env())
    }

    /// Use a custom parser table
    pub fn with_registry(config: LoaderConfig, registry: ParserRegistry) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Load a dataset, picking the encoding from the file extension
    ///
    /// Existence is checked first, so a missing file is always `NotFound`
    /// whatever its extension. JSON and YAML trees are validated before
    /// normalization; legacy `.py` datasets are executed and, unless
    /// `validate_legacy` is set, returned without schema checks.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<DatasetRecord, DatasetError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DatasetError::NotFound(path.to_path_buf()));
        }

        let parser = self.registry.select(path)?;
        self.load_with(path, parser)
    }

    /// Load a dataset with a fixed encoding, ignoring the extension
    pub fn load_as(
        &self,
        path: impl AsRef<Path>,
        format: DatasetFormat,
    ) -> Result<DatasetRecord, DatasetError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DatasetError::NotFound(path.to_path_buf()));
        }

        let parser = self.parser_for(format)?;
        self.load_with(path, parser)
    }

    /// Parse dataset text that is already in memory
    ///
    /// # Arguments
    /// * `text` - Dataset source
    /// * `format` - Encoding of `text`
    /// * `label` - Path to name in error messages, if the text came from one
    pub fn load_str(
        &self,
        text: &str,
        format: DatasetFormat,
        label: Option<&Path>,
    ) -> Result<DatasetRecord, DatasetError> {
        let parser = self.parser_for(format)?;
        let diagnostic = label.unwrap_or_else(|| Path::new(MEMORY_SOURCE));
        self.ensure_allowed(format, diagnostic)?;

        let parsed = parser.parse(diagnostic, text.as_bytes())?;
        self.finish(parsed, label)
    }

    fn parser_for(&self, format: DatasetFormat) -> Result<&dyn TreeParser, DatasetError> {
        self.registry
            .get(format)
            .ok_or_else(|| DatasetError::UnsupportedFormat {
                extension: format!(".{}", format.extensions()[0]),
                supported: self.registry.registered_extensions().join(", "),
            })
    }

    fn ensure_allowed(&self, format: DatasetFormat, path: &Path) -> Result<(), DatasetError> {
        if format == DatasetFormat::LegacyPython && !self.config.allow_legacy_python {
            return Err(DatasetError::LegacyDisabled(path.to_path_buf()));
        }
        Ok(())
    }

    fn load_with(&self, path: &Path, parser: &dyn TreeParser) -> Result<DatasetRecord, DatasetError> {
        let format = parser.format();
        self.ensure_allowed(format, path)?;

        tracing::debug!(path = %path.display(), %format, "loading dataset");
        let bytes = self.read(path)?;
        let sha256 = hex::encode(Sha256::digest(&bytes));

        let record = self.finish(parser.parse(path, &bytes)?, Some(path))?;

        tracing::debug!(
            path = %path.display(),
            ref_videos = record.ref_videos().len(),
            dis_videos = record.dis_videos().len(),
            "dataset loaded"
        );

        Ok(record.with_source(DatasetSource {
            path: path.to_path_buf(),
            format,
            sha256,
        }))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, DatasetError> {
        let size = fs::metadata(path)
            .map_err(|e| DatasetError::io(path, e))?
            .len();
        if size > self.config.max_file_size {
            return Err(DatasetError::FileTooLarge {
                size,
                max: self.config.max_file_size,
            });
        }

        fs::read(path).map_err(|e| DatasetError::io(path, e))
    }

    fn finish(&self, parsed: Parsed, source: Option<&Path>) -> Result<DatasetRecord, DatasetError> {
        match parsed {
            Parsed::Tree(tree) => {
                validate(&tree, source)?;
                Ok(normalize(tree).map_err(|e| e.with_source(source))?)
            }
            Parsed::Namespace(namespace) => {
                if self.config.validate_legacy {
                    validate_fields(&namespace.fields, source)?;
                }
                Ok(DatasetRecord::from_namespace(namespace))
            }
        }
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

/// Load a dataset in any supported format, configured from the environment
pub fn load_dataset(path: impl AsRef<Path>) -> Result<DatasetRecord, DatasetError> {
    DatasetLoader::from_env().load(path)
}

/// Load a JSON dataset regardless of its extension
pub fn load_json_dataset(path: impl AsRef<Path>) -> Result<DatasetRecord, DatasetError> {
    DatasetLoader::from_env().load_as(path, DatasetFormat::Json)
}

/// Load a YAML dataset regardless of its extension
pub fn load_yaml_dataset(path: impl AsRef<Path>) -> Result<DatasetRecord, DatasetError> {
    DatasetLoader::from_env().load_as(path, DatasetFormat::Yaml)
}

/// Execute a legacy Python dataset and collect its bindings
///
/// Runs arbitrary code from `path`; see [`LegacyPythonParser`](crate::parser::LegacyPythonParser).
pub fn load_python_dataset(path: impl AsRef<Path>) -> Result<DatasetRecord, DatasetError> {
    DatasetLoader::from_env().load_as(path, DatasetFormat::LegacyPython)
}
