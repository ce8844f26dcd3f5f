// Public API exports
pub mod export;
pub mod format;
pub mod loader;
pub mod parser;
pub mod record;
pub mod validate;

// Re-export main types for convenience
pub use format::DatasetFormat;

pub use loader::{
    load_dataset, load_json_dataset, load_python_dataset, load_yaml_dataset, DatasetError,
    DatasetLoader, LoaderConfig,
};

pub use parser::{
    JsonParser, LegacyPythonParser, Parsed, ParserRegistry, TreeParser, YamlParser,
};

pub use record::{
    normalize, DatasetRecord, DatasetSource, DistortedAsset, Namespace, OpaqueField,
    OpinionScores, ReferenceAsset,
};

pub use validate::{validate, validate as validate_dataset, ValidationError};

pub use export::{
    dataset_to_map, export_fields, save_dataset_json, to_json_string, DatasetFields, Export,
    SaveReport, DEFAULT_INDENT,
};
