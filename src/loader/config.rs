use crate::parser::DEFAULT_PYTHON;

/// Default per-file size limit (64 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Knobs for [`DatasetLoader`](super::DatasetLoader)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Interpreter that executes legacy `.py` datasets
    pub python: String,
    /// Whether legacy `.py` datasets may be executed at all
    pub allow_legacy_python: bool,
    /// Also run the schema checks on legacy datasets (off: they are trusted)
    pub validate_legacy: bool,
    /// Files larger than this are rejected before reading
    pub max_file_size: u64,
}

impl LoaderConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self {
            python: DEFAULT_PYTHON.to_string(),
            allow_legacy_python: true,
            validate_legacy: false,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Defaults overridden by `DATASET_LOADER_PYTHON`,
    /// `DATASET_LOADER_ALLOW_LEGACY` and `DATASET_LOADER_VALIDATE_LEGACY`
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Ok(python) = std::env::var("DATASET_LOADER_PYTHON") {
            if !python.trim().is_empty() {
                config.python = python;
            }
        }
        if let Some(allow) = env_flag("DATASET_LOADER_ALLOW_LEGACY") {
            config.allow_legacy_python = allow;
        }
        if let Some(validate) = env_flag("DATASET_LOADER_VALIDATE_LEGACY") {
            config.validate_legacy = validate;
        }

        config
    }

    pub fn python(mut self, python: impl Into<String>) -> Self {
        self.python = python.into();
        self
    }

    /// Permit executing legacy datasets (runs arbitrary code)
    pub fn allow_legacy_python(mut self, allow: bool) -> Self {
        self.allow_legacy_python = allow;
        self
    }

    pub fn validate_legacy(mut self, validate: bool) -> Self {
        self.validate_legacy = validate;
        self
    }

    pub fn max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn env_flag(key: &str) -> Option<bool> {
    let value = std::env::var(key).ok()?;
    match value.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}
