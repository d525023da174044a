use mirror_fs::{ConfigStore, Error};
use rstest::rstest;
use serde::Deserialize;
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Deserialize, PartialEq)]
struct TestConfig {
    name: String,
    count: i32,
}

#[rstest]
#[case("config.toml", "name = \"test\"\ncount = 42\n")]
#[case("config.json", r#"{"name": "test", "count": 42}"#)]
#[case("config.yaml", "name: test\ncount: 42\n")]
#[case("config.yml", "name: test\ncount: 42\n")]
fn test_load_detects_format(#[case] file_name: &str, #[case] content: &str) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(file_name);
    fs::write(&path, content).unwrap();

    let config: TestConfig = ConfigStore::new().load(&path).unwrap();

    assert_eq!(
        config,
        TestConfig {
            name: "test".into(),
            count: 42
        }
    );
}

#[test]
fn test_load_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.ini");
    fs::write(&path, "name=test").unwrap();

    let result: Result<TestConfig, _> = ConfigStore::new().load(&path);
    assert!(matches!(result, Err(Error::UnsupportedFormat { extension }) if extension == "ini"));
}

#[test]
fn test_load_invalid_toml_reports_format() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "name = [unclosed").unwrap();

    let result: Result<TestConfig, _> = ConfigStore::new().load(&path);
    match result {
        Err(Error::ConfigParse { format, .. }) => assert_eq!(format, "TOML"),
        other => panic!("Expected ConfigParse, got {:?}", other),
    }
}

#[test]
fn test_load_missing_file() {
    let temp = TempDir::new().unwrap();
    let result: Result<TestConfig, _> = ConfigStore::new().load(&temp.path().join("none.toml"));
    assert!(matches!(result, Err(ref e) if e.is_not_found()));
}
