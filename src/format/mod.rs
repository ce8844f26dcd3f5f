use crate::loader::DatasetError;
use std::fmt;
use std::path::Path;

/// Encodings a dataset description can be stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetFormat {
    /// JSON object (.json)
    Json,
    /// YAML mapping (.yaml, .yml)
    Yaml,
    /// Python source defining top-level bindings (.py)
    LegacyPython,
}

impl DatasetFormat {
    /// Every format, in the order extensions are listed in error messages
    pub const ALL: [DatasetFormat; 3] = [Self::Json, Self::Yaml, Self::LegacyPython];

    /// Map a bare extension (no dot, any case) to a format
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "py" => Some(Self::LegacyPython),
            _ => None,
        }
    }

    /// Detect the format of a dataset file from its extension
    ///
    /// Pure function of the path: the file is not touched.
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        Self::from_extension(ext).ok_or_else(|| DatasetError::UnsupportedFormat {
            extension: if ext.is_empty() {
                String::new()
            } else {
                format!(".{}", ext.to_lowercase())
            },
            supported: Self::supported_extensions().join(", "),
        })
    }

    /// File extensions for this format, without the dot
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Json => &["json"],
            Self::Yaml => &["yaml", "yml"],
            Self::LegacyPython => &["py"],
        }
    }

    /// All supported extensions with a leading dot
    pub fn supported_extensions() -> Vec<String> {
        Self::ALL
            .iter()
            .flat_map(|f| f.extensions().iter().map(|e| format!(".{}", e)))
            .collect()
    }

    /// Declarative formats are schema-checked on load; the legacy format is not
    pub fn is_declarative(&self) -> bool {
        !matches!(self, Self::LegacyPython)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::LegacyPython => "python",
        }
    }
}

impl fmt::Display for DatasetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
