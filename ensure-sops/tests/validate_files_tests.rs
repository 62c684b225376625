//! Integration tests for `ensure_sops::validate_files` and format detection.

use std::fs;
use std::path::PathBuf;

use ensure_sops::{
    Format, FsSourceConfig, ScanErrorKind, SopsValidator, Strategy, ValidationConfig,
    ValidationFailure, ValueTree, validate_files,
};
use serde_json::{Value, json};
use tempfile::TempDir;

const ENCRYPTED_JSON: &str = r#"{
	"database": {
		"user": "ENC[AES256_GCM,data:8HhK,iv:QW1s2N0yTgC6q0vZ5Yw2hQ==,tag:3WkY1hT7G4l8e9yAvCj0Aw==,type:str]",
		"ports": [
			"ENC[AES256_GCM,data:Nzk=,iv:2m3j4k5l6m7n8o9p0q1r2s==,tag:a1b2c3d4e5f6g7h8i9j0kA==,type:int]"
		]
	},
	"comment": "",
	"sops": {
		"kms": null,
		"age": [
			{
				"recipient": "age1ql3z7hjy54pw3hyww5ayyfg7zqgvc7w3j2elw8zmrj2kg5sfn9aqmcac8p",
				"enc": "-----BEGIN AGE ENCRYPTED FILE-----\nYWdlLWVuY3J5cHRpb24ub3JnL3YxCi0+IFgyNTUxOQ==\n-----END AGE ENCRYPTED FILE-----\n"
			}
		],
		"lastmodified": "2024-03-01T10:00:00Z",
		"mac": "ENC[AES256_GCM,data:bWFj,iv:aXY=,tag:dGFn,type:str]",
		"unencrypted_suffix": "_unencrypted",
		"version": "3.8.1"
	}
}
"#;

const ENCRYPTED_YAML: &str = "\
database:
    user: ENC[AES256_GCM,data:8HhK,iv:QW1s2N0yTgC6q0vZ5Yw2hQ==,tag:3WkY1hT7G4l8e9yAvCj0Aw==,type:str]
    hosts:
        - ENC[AES256_GCM,data:aG9zdA==,iv:aXY=,tag:dGFn,type:str]
        - ENC[AES256_GCM,data:aG9zdDI=,iv:aXY=,tag:dGFn,type:str]
sops:
    kms: []
    age:
        - recipient: age1ql3z7hjy54pw3hyww5ayyfg7zqgvc7w3j2elw8zmrj2kg5sfn9aqmcac8p
    lastmodified: \"2024-03-01T10:00:00Z\"
    mac: ENC[AES256_GCM,data:bWFj,iv:aXY=,tag:dGFn,type:str]
    version: 3.8.1
";

const ENCRYPTED_INI: &str = "\
[database]
user     = ENC[AES256_GCM,data:8HhK,iv:QW1s2N0yTgC6q0vZ5Yw2hQ==,tag:3WkY1hT7G4l8e9yAvCj0Aw==,type:str]
password = ENC[AES256_GCM,data:cGFzcw==,iv:aXY=,tag:dGFn,type:str]

[sops]
age__list_0__map_recipient = age1ql3z7hjy54pw3hyww5ayyfg7zqgvc7w3j2elw8zmrj2kg5sfn9aqmcac8p
lastmodified               = 2024-03-01T10:00:00Z
mac                        = ENC[AES256_GCM,data:bWFj,iv:aXY=,tag:dGFn,type:str]
version                    = 3.8.1
";

const ENCRYPTED_ENV: &str = "\
DB_USER=ENC[AES256_GCM,data:8HhK,iv:QW1s2N0yTgC6q0vZ5Yw2hQ==,tag:3WkY1hT7G4l8e9yAvCj0Aw==,type:str]
DB_PASSWORD=ENC[AES256_GCM,data:cGFzcw==,iv:aXY=,tag:dGFn,type:str]
sops_age__list_0__map_recipient=age1ql3z7hjy54pw3hyww5ayyfg7zqgvc7w3j2elw8zmrj2kg5sfn9aqmcac8p
sops_lastmodified=2024-03-01T10:00:00Z
sops_mac=ENC[AES256_GCM,data:bWFj,iv:aXY=,tag:dGFn,type:str]
sops_version=3.8.1
";

const PLAIN_JSON: &str = r#"{"database": {"user": "admin", "ports": [5432]}}"#;
const PLAIN_YAML: &str = "database:\n  user: admin\n";
const PLAIN_INI: &str = "[database]\nuser = admin\n";
const PLAIN_ENV: &str = "DB_USER=admin\n";

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn fs_config(paths: Vec<PathBuf>) -> FsSourceConfig {
    let mut cfg = FsSourceConfig::default();
    cfg.paths = paths;
    cfg
}

fn config(strategy: Strategy) -> ValidationConfig {
    let mut cfg = ValidationConfig::default();
    cfg.strategy = strategy;
    cfg
}

fn parse(content: &str, filename: &str) -> (Format, ValueTree) {
    SopsValidator::new(content.as_bytes(), filename, Strategy::Strict)
        .parse()
        .unwrap()
}

#[test]
fn test_encrypted_fixtures_parse_with_metadata() {
    let cases = [
        (ENCRYPTED_JSON, "enc.test.json", Format::Json),
        (ENCRYPTED_YAML, "enc.test.yaml", Format::Yaml),
        (ENCRYPTED_INI, "enc.test.ini", Format::Ini),
        (ENCRYPTED_ENV, "enc.test.env", Format::Env),
    ];
    for (content, filename, expected) in cases {
        let (format, values) = parse(content, filename);
        assert_eq!(format, expected);
        assert!(values.keys().any(|key| format.is_reserved_key(key)));

        let (has_sops_keys, cleaned) = format.filter_values(&values);
        assert!(has_sops_keys, "{filename}: metadata not detected");
        assert!(!cleaned.keys().any(|key| format.is_reserved_key(key)));
        assert!(!cleaned.is_empty());
    }
}

#[test]
fn test_plain_fixtures_parse_without_metadata() {
    let cases = [
        (PLAIN_JSON, "test.json", Format::Json),
        (PLAIN_YAML, "test.yaml", Format::Yaml),
        (PLAIN_INI, "test.ini", Format::Ini),
        (PLAIN_ENV, "test.env", Format::Env),
    ];
    for (content, filename, expected) in cases {
        let (format, values) = parse(content, filename);
        assert_eq!(format, expected);
        assert!(!values.is_empty());
        let (has_sops_keys, _) = format.filter_values(&values);
        assert!(!has_sops_keys, "{filename}: metadata wrongly detected");
    }
}

#[test]
fn test_validate_files_empty_paths_errors() {
    let result = validate_files(&fs_config(vec![]), &ValidationConfig::default());
    let msg = result.unwrap_err().to_string();
    assert!(msg.contains("No paths provided"), "got: {msg}");
}

#[test]
fn test_validate_files_all_encrypted() {
    let tmp = TempDir::new().unwrap();
    let paths = vec![
        write(&tmp, "enc.test.json", ENCRYPTED_JSON),
        write(&tmp, "enc.test.yaml", ENCRYPTED_YAML),
        write(&tmp, "enc.test.ini", ENCRYPTED_INI),
        write(&tmp, "enc.test.env", ENCRYPTED_ENV),
    ];
    let report = validate_files(&fs_config(paths), &ValidationConfig::default()).unwrap();
    assert!(report.ok, "unexpected failures: {:?}", report.failures);
    assert_eq!(report.checked_files, 4);
    assert_eq!(report.failed_files(), 0);
}

#[test]
fn test_validate_files_reports_unencrypted_paths() {
    let tmp = TempDir::new().unwrap();
    let path = write(&tmp, "test.json", PLAIN_JSON);
    let report = validate_files(&fs_config(vec![path.clone()]), &ValidationConfig::default())
        .unwrap();
    assert!(!report.ok);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file, path);
    assert_eq!(report.failures[0].format, Format::Json);
    assert_eq!(
        report.failures[0].failure,
        ValidationFailure::UnencryptedItems {
            items: vec!["database.user".to_owned(), "database.ports.0".to_owned()]
        }
    );
}

#[test]
fn test_validate_files_missing_metadata() {
    let tmp = TempDir::new().unwrap();
    let path = write(&tmp, "test.yaml", "token: ENC[x]\nempty:\n");
    let report = validate_files(&fs_config(vec![path]), &ValidationConfig::default()).unwrap();
    assert_eq!(
        report.failures[0].failure,
        ValidationFailure::MissingMetadata {
            found_keys: vec!["token".to_owned(), "empty".to_owned()]
        }
    );
}

#[test]
fn test_strict_cannot_detect_renamed_env() {
    let tmp = TempDir::new().unwrap();
    let path = write(&tmp, "enc.test.foo", ENCRYPTED_ENV);
    let report = validate_files(&fs_config(vec![path]), &config(Strategy::Strict)).unwrap();
    assert!(!report.ok);
    assert_eq!(report.failures[0].format, Format::Bin);
    assert_eq!(
        report.failures[0].failure,
        ValidationFailure::UnknownFormat {
            tried_formats: vec![Format::Json, Format::Yaml]
        }
    );
}

#[test]
fn test_bruteforce_detects_renamed_env() {
    let tmp = TempDir::new().unwrap();
    let path = write(&tmp, "enc.test.foo", ENCRYPTED_ENV);
    let report = validate_files(&fs_config(vec![path]), &config(Strategy::Bruteforce)).unwrap();
    assert!(report.ok, "unexpected failures: {:?}", report.failures);
}

#[test]
fn test_bruteforce_unknown_content_lists_all_formats() {
    let tmp = TempDir::new().unwrap();
    let path = write(&tmp, "blob.dat", "Lorem ipsum dolor");
    let report = validate_files(&fs_config(vec![path]), &config(Strategy::Bruteforce)).unwrap();
    assert_eq!(
        report.failures[0].failure,
        ValidationFailure::UnknownFormat {
            tried_formats: Format::ALL.to_vec()
        }
    );
}

#[test]
fn test_unreadable_files_are_scan_errors() {
    let tmp = TempDir::new().unwrap();
    let good = write(&tmp, "enc.test.env", ENCRYPTED_ENV);
    let missing = tmp.path().join("missing.json");
    let report =
        validate_files(&fs_config(vec![missing.clone(), good]), &ValidationConfig::default())
            .unwrap();
    assert!(!report.ok);
    assert_eq!(report.checked_files, 1);
    assert_eq!(report.files_attempted(), 2);
    assert_eq!(report.scan_errors.len(), 1);
    assert_eq!(report.scan_errors[0].file, missing);
    assert_eq!(report.scan_errors[0].kind, ScanErrorKind::IoError);
    assert!(report.failures.is_empty());
}

#[test]
fn test_oversized_files_are_scan_errors() {
    let tmp = TempDir::new().unwrap();
    let path = write(&tmp, "enc.test.json", ENCRYPTED_JSON);
    let mut cfg = fs_config(vec![path]);
    cfg.max_file_size = 16;
    let report = validate_files(&cfg, &ValidationConfig::default()).unwrap();
    assert_eq!(report.scan_errors[0].kind, ScanErrorKind::FileTooLarge);
}

#[test]
fn test_directory_dots_are_not_hints() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("conf.env");
    fs::create_dir(&dir).unwrap();
    let path = dir.join("secrets");
    fs::write(&path, ENCRYPTED_JSON).unwrap();
    let report = validate_files(&fs_config(vec![path]), &config(Strategy::Strict)).unwrap();
    assert!(report.ok, "unexpected failures: {:?}", report.failures);
}

fn encrypt_leaves(value: &mut Value) {
    match value {
        Value::Object(map) => map.values_mut().for_each(encrypt_leaves),
        Value::Array(items) => items.iter_mut().for_each(encrypt_leaves),
        leaf => *leaf = Value::String(format!("ENC[AES256_GCM,data:{leaf},type:str]")),
    }
}

fn check_after_encryption(mut document: Value, format: Format, metadata: &[(&str, Value)]) {
    encrypt_leaves(&mut document);
    let Value::Object(mut values) = document else {
        panic!("documents must be objects");
    };
    for (key, value) in metadata {
        values.insert((*key).to_owned(), value.clone());
    }
    let validator = SopsValidator::new(&b""[..], "generated.json", Strategy::Strict);
    assert_eq!(validator.check_encryption(format, &values), Ok(()));
}

#[test]
fn test_encrypting_every_leaf_always_passes() {
    let documents = [
        json!({}),
        json!({"a": "plain", "b": 1, "c": true, "d": null}),
        json!({"nested": {"deeper": [{"x": "1"}, ["y", 2.5]], "z": ""}}),
        json!({"list": [[[["deep"]]]], "sops_like": {"sops": "inner"}}),
    ];
    for document in documents {
        check_after_encryption(
            document.clone(),
            Format::Json,
            &[("sops", json!({"version": "3.8.1"}))],
        );
        check_after_encryption(document, Format::Env, &[("sops_version", json!("3.8.1"))]);
    }
}
