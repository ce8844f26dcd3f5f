use super::{Parsed, TreeParser};
use crate::format::DatasetFormat;
use crate::loader::DatasetError;
use crate::record::Namespace;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};

/// Interpreter used when none is configured
pub const DEFAULT_PYTHON: &str = "python3";

// Runs the dataset source (read from stdin) in a fresh namespace and prints
// its public bindings as {"fields": {...}, "opaque": [...]}. Anything the
// dataset itself prints goes to stderr so stdout stays parseable.
// Conversion is per leaf: non-finite floats become null, and a nested value
// with no JSON form becomes null and is listed in "opaque" under its path.
// Only top-level bindings that are not data at all (modules, functions)
// are left out of "fields".
const BRIDGE_SCRIPT: &str = r#"
import json, math, numbers, os, sys

path = sys.argv[1]
source = sys.stdin.buffer.read()
sys.path.insert(0, os.path.dirname(os.path.abspath(path)))

out, sys.stdout = sys.stdout, sys.stderr
namespace = {"__name__": "__dataset__", "__file__": path}
exec(compile(source, path, "exec"), namespace)
sys.stdout = out

DATA = (type(None), str, bool, numbers.Real, list, tuple, dict)
opaque = []

def mark(where, value):
    opaque.append({"name": where, "type_name": type(value).__name__})

def plain(value, where):
    if value is None or isinstance(value, (str, bool)):
        return value
    if isinstance(value, numbers.Integral):
        return int(value)
    if isinstance(value, numbers.Real):
        value = float(value)
        return value if math.isfinite(value) else None
    if isinstance(value, (list, tuple)):
        return [plain(v, "%s[%d]" % (where, i)) for i, v in enumerate(value)]
    if isinstance(value, dict):
        converted = {}
        for k, v in value.items():
            at = "%s[%r]" % (where, k)
            if isinstance(k, str):
                converted[k] = plain(v, at)
            elif k is None or isinstance(k, bool):
                converted[json.dumps(k)] = plain(v, at)
            elif isinstance(k, numbers.Integral):
                converted[str(int(k))] = plain(v, at)
            elif isinstance(k, numbers.Real):
                converted[json.dumps(float(k))] = plain(v, at)
            else:
                mark(at, k)
        return converted
    mark(where, value)
    return None

fields = {}
for name, value in namespace.items():
    if name.startswith("__") and name.endswith("__"):
        continue
    if isinstance(value, DATA):
        fields[name] = plain(value, name)
    else:
        mark(name, value)

json.dump({"fields": fields, "opaque": opaque}, sys.stdout, allow_nan=False)
"#;

/// Legacy `.py` datasets
///
/// **Executes the file.** The source runs in an external Python interpreter
/// with the caller's privileges; only load legacy datasets you trust. The
/// interpreter reports every top-level binding. Bindings that are not data
/// (modules, functions) come back as opaque fields; inside data, NaN and
/// infinities become null and unrepresentable leaves become null and are
/// also listed as opaque under their path (e.g. `dis_videos[0]['handle']`).
pub struct LegacyPythonParser {
    python: String,
}

impl LegacyPythonParser {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }

    pub fn python(&self) -> &str {
        &self.python
    }

    fn legacy_error(path: &Path, message: impl Into<String>) -> DatasetError {
        DatasetError::Legacy {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

impl Default for LegacyPythonParser {
    fn default() -> Self {
        Self::new(DEFAULT_PYTHON)
    }
}

impl TreeParser for LegacyPythonParser {
    fn format(&self) -> DatasetFormat {
        DatasetFormat::LegacyPython
    }

    fn parse(&self, path: &Path, bytes: &[u8]) -> Result<Parsed, DatasetError> {
        tracing::warn!(
            path = %path.display(),
            python = %self.python,
            "executing legacy python dataset"
        );

        let mut child = Command::new(&self.python)
            .arg("-c")
            .arg(BRIDGE_SCRIPT)
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => DatasetError::MissingDependency {
                    dependency: "A Python interpreter",
                    remedy: format!(
                        "Could not run '{}'. Install Python 3 or set DATASET_LOADER_PYTHON.",
                        self.python
                    ),
                },
                _ => Self::legacy_error(path, format!("failed to spawn {}: {}", self.python, e)),
            })?;

        // Closing stdin lets the interpreter see EOF
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(bytes)
                .map_err(|e| Self::legacy_error(path, format!("failed to send source: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| Self::legacy_error(path, format!("failed to wait for interpreter: {}", e)))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            tracing::debug!(path = %path.display(), stderr = %stderr, "legacy dataset failed");
            let message = stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .map(str::trim)
                .unwrap_or("interpreter exited with an error")
                .to_string();
            return Err(Self::legacy_error(path, message));
        }
        if !stderr.is_empty() {
            tracing::debug!(path = %path.display(), stderr = %stderr, "legacy dataset output");
        }

        let namespace: Namespace = serde_json::from_slice(&output.stdout).map_err(|e| {
            Self::legacy_error(path, format!("interpreter produced malformed output: {}", e))
        })?;

        tracing::debug!(
            path = %path.display(),
            fields = namespace.fields.len(),
            opaque = namespace.opaque.len(),
            "legacy dataset evaluated"
        );
        Ok(Parsed::Namespace(namespace))
    }
}
