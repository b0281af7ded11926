//! Configuration Tests
//!
//! Dumps driven by a `vardump.toml` on disk.

use tempfile::TempDir;

use vardump::CONFIG_FILE_NAME;

use crate::common::*;

fn config_in(dir: &TempDir, content: &str) -> DumpConfig {
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, content).unwrap();
    DumpConfig::from_file(&path).unwrap()
}

#[test]
fn json_format_from_file() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir, "format = \"json\"\n");

    let mut heap = Heap::new();
    let list = heap.list([true]).unwrap();
    let out = vardump::dump_to_string(&heap, &Value::Ref(list), None, &config).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(doc[0]["children"][0]["value"], true);
}

#[test]
fn html_anchor_prefix_from_file() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir, "format = \"html\"\nanchor_prefix = \"dbg-\"\n");

    let mut heap = Heap::new();
    let list = self_containing_list(&mut heap);
    let out = vardump::dump_to_string(&heap, &Value::Ref(list), None, &config).unwrap();
    assert!(out.contains(r##"href="#dbg-1""##));
}

#[test]
fn generated_default_file_dumps_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    DumpConfig::write_default_if_missing(&path).unwrap();
    let config = DumpConfig::from_file(&path).unwrap();

    let heap = Heap::new();
    let out = vardump::dump_to_string(&heap, &Value::Int(7), Some(&VarName::from("n")), &config)
        .unwrap();
    assert_eq!(out, "n: int(7) #1\n");
}

#[test]
fn malformed_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "max_depth = \"deep\"").unwrap();

    let err = DumpConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, DumpError::Config(_)));
    assert!(err.to_string().contains(CONFIG_FILE_NAME));
}
