//! File-based option loading and merging.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{MergeOptionsError, Result};
use crate::merge::merge_options_into;

/// Read and parse a single JSON file.
pub fn load_json_file(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MergeOptionsError::MissingRequired {
                path: path.to_path_buf(),
            }
        } else {
            MergeOptionsError::Read {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    serde_json::from_str(&content).map_err(|e| MergeOptionsError::Parse {
        origin: path.display().to_string(),
        source: e,
    })
}

/// Read a JSON file that may be absent. Missing files yield `None`.
pub fn load_optional_json_file(path: &Path) -> Result<Option<Value>> {
    match load_json_file(path) {
        Ok(value) => Ok(Some(value)),
        Err(MergeOptionsError::MissingRequired { .. }) => {
            tracing::debug!(path = %path.display(), "optional config file not found, skipping");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Load and merge JSON files in priority order.
///
/// Merge order:
/// 1. `required` (must exist and hold an object)
/// 2. each of `optional`, skipped silently when missing
///
/// Later files win.
pub fn merge_json_files(required: &Path, optional: &[PathBuf]) -> Result<Map<String, Value>> {
    let base = load_json_file(required)?;
    if !base.is_object() {
        return Err(MergeOptionsError::NotAnObject {
            origin: required.display().to_string(),
        });
    }

    let mut final_config = Map::new();
    merge_options_into(&mut final_config, &base);

    for file_path in optional {
        if let Some(file_config) = load_optional_json_file(file_path)? {
            merge_options_into(&mut final_config, &file_config);
        }
    }

    Ok(final_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn make_config_dir(dir: &Path, files: &[(&str, &str)]) -> PathBuf {
        let config_dir = dir.join("config");
        fs::create_dir_all(&config_dir).unwrap();
        for (name, content) in files {
            let mut f = fs::File::create(config_dir.join(name)).unwrap();
            f.write_all(content.as_bytes()).unwrap();
        }
        config_dir
    }

    #[test]
    fn test_loads_default_json() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = make_config_dir(
            dir.path(),
            &[("default.json", r#"{"API_URL":"http://localhost:3000","MAX_RETRIES":3}"#)],
        );
        let result = merge_json_files(&config_dir.join("default.json"), &[]).unwrap();
        assert_eq!(result["API_URL"], json!("http://localhost:3000"));
        assert_eq!(result["MAX_RETRIES"], json!(3));
    }

    #[test]
    fn test_raises_without_default() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = make_config_dir(dir.path(), &[]);
        let result = merge_json_files(&config_dir.join("default.json"), &[]);
        match result {
            Err(MergeOptionsError::MissingRequired { path }) => {
                assert!(path.ends_with("default.json"));
            }
            other => panic!("expected MissingRequired, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_object_default() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = make_config_dir(dir.path(), &[("default.json", "[1, 2, 3]")]);
        let result = merge_json_files(&config_dir.join("default.json"), &[]);
        assert!(matches!(result, Err(MergeOptionsError::NotAnObject { .. })));
    }

    #[test]
    fn test_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = make_config_dir(
            dir.path(),
            &[("default.json", r#"{"a":1}"#), ("broken.json", r#"{"a":"#)],
        );
        let result = merge_json_files(&config_dir.join("default.json"), &[config_dir.join("broken.json")]);
        let err = result.unwrap_err();
        assert!(matches!(err, MergeOptionsError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_skips_missing_optional_files() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = make_config_dir(dir.path(), &[("default.json", r#"{"a":1}"#)]);
        let result = merge_json_files(
            &config_dir.join("default.json"),
            &[config_dir.join("local.json"), config_dir.join("production.json")],
        )
        .unwrap();
        assert_eq!(Value::Object(result), json!({"a": 1}));
    }

    #[test]
    fn test_merges_env_specific() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = make_config_dir(
            dir.path(),
            &[
                ("default.json", r#"{"API_URL":"http://localhost","MAX_RETRIES":3}"#),
                ("development.json", r#"{"API_URL":"http://dev-api.example.com"}"#),
            ],
        );
        let result = merge_json_files(
            &config_dir.join("default.json"),
            &[config_dir.join("development.json")],
        )
        .unwrap();
        assert_eq!(result["API_URL"], json!("http://dev-api.example.com"));
        assert_eq!(result["MAX_RETRIES"], json!(3));
    }

    #[test]
    fn test_merges_nested_layers_and_replaces_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = make_config_dir(
            dir.path(),
            &[
                (
                    "default.json",
                    r#"{"DATABASE":{"host":"localhost","port":5432,"ssl":false},"HOSTS":["a","b"]}"#,
                ),
                (
                    "production.json",
                    r#"{"DATABASE":{"host":"prod-db.example.com","ssl":true},"HOSTS":["c"]}"#,
                ),
                ("production.aws.json", r#"{"DATABASE":{"host":"aws-db.example.com"}}"#),
            ],
        );
        let result = merge_json_files(
            &config_dir.join("default.json"),
            &[config_dir.join("production.json"), config_dir.join("production.aws.json")],
        )
        .unwrap();
        let db = result["DATABASE"].as_object().unwrap();
        assert_eq!(db["host"], json!("aws-db.example.com"));
        assert_eq!(db["port"], json!(5432));
        assert_eq!(db["ssl"], json!(true));
        assert_eq!(result["HOSTS"], json!(["c"]));
    }

    #[test]
    fn test_optional_file_loader() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = make_config_dir(dir.path(), &[("present.json", r#"{"x":true}"#)]);
        assert_eq!(
            load_optional_json_file(&config_dir.join("present.json")).unwrap(),
            Some(json!({"x": true}))
        );
        assert_eq!(load_optional_json_file(&config_dir.join("absent.json")).unwrap(), None);
    }
}
