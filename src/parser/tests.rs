use super::*;
use serde_json::json;
use std::path::Path;
use std::process::Command;

// Legacy tests need an interpreter; say so on stderr instead of passing silently
fn python_available(test: &str) -> bool {
    let found = Command::new(DEFAULT_PYTHON)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    if !found {
        eprintln!("skipping {}: {} is not available", test, DEFAULT_PYTHON);
    }
    found
}

fn tree(parsed: Parsed) -> Value {
    match parsed {
        Parsed::Tree(value) => value,
        Parsed::Namespace(_) => panic!("expected a tree"),
    }
}

fn namespace(parsed: Parsed) -> Namespace {
    match parsed {
        Parsed::Namespace(ns) => ns,
        Parsed::Tree(_) => panic!("expected a namespace"),
    }
}

// ========================================================================
// JsonParser Tests
// ========================================================================

#[test]
fn test_json_parses_into_tree() {
    let parsed = JsonParser
        .parse(Path::new("d.json"), br#"{"b": 1, "a": [1, 2]}"#)
        .unwrap();
    let value = tree(parsed);
    assert_eq!(value, json!({"b": 1, "a": [1, 2]}));

    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["b", "a"]);
}

#[test]
fn test_json_syntax_error_propagates() {
    let err = JsonParser
        .parse(Path::new("d.json"), b"{\"ref_videos\": [")
        .unwrap_err();
    assert!(matches!(err, DatasetError::Json(_)));
}

#[test]
fn test_json_non_finite_tokens_read_as_null() {
    let text = br#"{"dis_videos": [{"os": [4, NaN, -Infinity]}], "label": "NaN"}"#;
    let value = tree(JsonParser.parse(Path::new("d.json"), text).unwrap());
    assert_eq!(
        value,
        json!({"dis_videos": [{"os": [4, null, null]}], "label": "NaN"})
    );
}

// ========================================================================
// YamlParser Tests
// ========================================================================

#[cfg(feature = "yaml")]
#[test]
fn test_yaml_parses_into_tree() {
    let text = b"dataset_name: d1\nref_score: 5.0\nref_videos:\n  - content_id: 0\n    path: r.yuv\n";
    let value = tree(YamlParser.parse(Path::new("d.yaml"), text).unwrap());
    assert_eq!(
        value,
        json!({
            "dataset_name": "d1",
            "ref_score": 5.0,
            "ref_videos": [{"content_id": 0, "path": "r.yuv"}]
        })
    );
}

#[cfg(feature = "yaml")]
#[test]
fn test_yaml_scalar_keys_are_stringified() {
    let text = b"os:\n  1: 4\n  true: 5\n  ~: 3\n";
    let value = tree(YamlParser.parse(Path::new("d.yaml"), text).unwrap());
    assert_eq!(value, json!({"os": {"1": 4, "true": 5, "null": 3}}));
}

#[cfg(feature = "yaml")]
#[test]
fn test_yaml_tags_dropped_and_nan_nulled() {
    let text = b"width: !custom 1920\nscore: .nan\n";
    let value = tree(YamlParser.parse(Path::new("d.yaml"), text).unwrap());
    assert_eq!(value, json!({"width": 1920, "score": null}));
}

#[cfg(feature = "yaml")]
#[test]
fn test_yaml_syntax_error_propagates() {
    let err = YamlParser
        .parse(Path::new("d.yaml"), b"ref_videos: [unclosed\n")
        .unwrap_err();
    assert!(matches!(err, DatasetError::Yaml(_)));
}

#[cfg(not(feature = "yaml"))]
#[test]
fn test_yaml_without_feature_is_missing_dependency() {
    let err = YamlParser.parse(Path::new("d.yaml"), b"a: 1").unwrap_err();
    assert!(matches!(err, DatasetError::MissingDependency { .. }));
}

// ========================================================================
// LegacyPythonParser Tests
// ========================================================================

#[test]
fn test_legacy_missing_interpreter_is_missing_dependency() {
    let parser = LegacyPythonParser::new("definitely-not-a-python-interpreter");
    let err = parser.parse(Path::new("d.py"), b"x = 1\n").unwrap_err();
    assert!(matches!(err, DatasetError::MissingDependency { .. }));
    assert!(err.to_string().contains("DATASET_LOADER_PYTHON"));
}

#[test]
fn test_legacy_bindings_become_namespace() {
    if !python_available("test_legacy_bindings_become_namespace") {
        return;
    }
    let source = b"import os\n\
dataset_name = 'legacy'\n\
ref_score = 5.0\n\
ref_videos = [{'content_id': 0, 'path': 'r.yuv'}]\n\
dis_videos = [{'asset_id': 0, 'content_id': 0, 'path': 'd.yuv', 'os': (4, 5)}]\n\
_hidden = 1\n\
print('noise')\n";

    let ns = namespace(LegacyPythonParser::default().parse(Path::new("d.py"), source).unwrap());

    assert_eq!(ns.fields["dataset_name"], json!("legacy"));
    assert_eq!(ns.fields["dis_videos"][0]["os"], json!([4, 5]));
    assert_eq!(ns.fields["_hidden"], json!(1));
    assert!(ns.opaque.iter().any(|o| o.name == "os" && o.type_name == "module"));

    let keys: Vec<&String> = ns.fields.keys().collect();
    assert_eq!(keys, vec!["dataset_name", "ref_score", "ref_videos", "dis_videos", "_hidden"]);
}

#[test]
fn test_legacy_nan_inside_binding_keeps_binding() {
    if !python_available("test_legacy_nan_inside_binding_keeps_binding") {
        return;
    }
    let source = b"dis_videos = [{'asset_id': 0, 'content_id': 0, 'path': 'd.yuv', 'os': [4, float('nan'), 5]}]\n\
ref_score = float('inf')\n";

    let ns = namespace(LegacyPythonParser::default().parse(Path::new("d.py"), source).unwrap());

    assert_eq!(ns.fields["dis_videos"][0]["os"], json!([4, null, 5]));
    assert_eq!(ns.fields["dis_videos"][0]["path"], json!("d.yuv"));
    assert_eq!(ns.fields["ref_score"], Value::Null);
    assert!(ns.opaque.is_empty(), "unexpected opaque: {:?}", ns.opaque);
}

#[test]
fn test_legacy_nested_non_data_leaf_is_nulled() {
    if !python_available("test_legacy_nested_non_data_leaf_is_nulled") {
        return;
    }
    let source = b"dis_videos = [{'asset_id': 0, 'os': {'s1': 4, 2: 5}, 'handle': len}]\n";

    let ns = namespace(LegacyPythonParser::default().parse(Path::new("d.py"), source).unwrap());

    let asset = &ns.fields["dis_videos"][0];
    assert_eq!(asset["os"], json!({"s1": 4, "2": 5}));
    assert_eq!(asset["handle"], Value::Null);
    assert!(!ns.opaque.iter().any(|o| o.name == "dis_videos"));
    assert!(ns
        .opaque
        .iter()
        .any(|o| o.name == "dis_videos[0]['handle']" && o.type_name == "builtin_function_or_method"));
}

#[test]
fn test_legacy_syntax_error_reports_interpreter_message() {
    if !python_available("test_legacy_syntax_error_reports_interpreter_message") {
        return;
    }
    let err = LegacyPythonParser::default()
        .parse(Path::new("broken.py"), b"ref_videos = [\n")
        .unwrap_err();

    match err {
        DatasetError::Legacy { path, message } => {
            assert_eq!(path, Path::new("broken.py"));
            assert!(message.contains("SyntaxError"), "got: {}", message);
        }
        other => panic!("unexpected error: {other}"),
    }
}
