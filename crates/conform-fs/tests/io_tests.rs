use conform_fs::{NormalizedPath, io};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("package.json"));

    io::write_atomic(&path, b"{}").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "{}");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("package.json");
    fs::write(&file_path, "original").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"updated").unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "updated");
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("package.json"));

    io::write_text(&path, "content").unwrap();

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp files remain: {:?}", leftovers);
}

#[test]
fn test_write_text_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("packages").join("add").join("package.json"));

    io::write_text(&path, "{}").unwrap();

    assert_eq!(io::read_text(&path).unwrap(), "{}");
}

#[test]
fn test_read_text_nonexistent_file() {
    let path = NormalizedPath::new("/nonexistent/package.json");
    let result = io::read_text(&path);
    assert!(matches!(result, Err(conform_fs::Error::Io { .. })));
}

#[test]
fn test_write_json_pretty_uses_two_space_indent_and_keeps_order() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("package.json"));
    let doc: serde_json::Value =
        serde_json::from_str(r#"{"version":"0.0.0","name":"@myrepo/add","exports":{"b":1,"a":2}}"#)
            .unwrap();

    io::write_json_pretty(&path, &doc).unwrap();

    let written = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(
        written,
        "{\n  \"version\": \"0.0.0\",\n  \"name\": \"@myrepo/add\",\n  \"exports\": {\n    \"b\": 1,\n    \"a\": 2\n  }\n}\n"
    );
    let reparsed: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(reparsed, json!({"version": "0.0.0", "name": "@myrepo/add", "exports": {"b": 1, "a": 2}}));
}
