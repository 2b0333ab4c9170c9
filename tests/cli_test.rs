//! CLI integration tests
//!
//! Tests for the command-line interface using assert_cmd.
//!
//! These tests verify:
//! - Help and version flags
//! - Configuration validation
//! - Dry run mode
//! - Error handling for missing or invalid files

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

/// Get a command for the jolokia-exporter binary
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin("jolokia-exporter").expect("Failed to find jolokia-exporter binary")
}

/// Helper to create a temporary config file with given content
fn create_temp_config(content: &str) -> NamedTempFile {
    create_temp_config_with_suffix(content, ".yaml")
}

fn create_temp_config_with_suffix(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write config");
    file.flush().expect("Failed to flush");
    file
}

const VALID_CONFIG: &str = r#"
jolokia:
  url: "http://localhost:8778/jolokia"
  timeout_ms: 5000

server:
  port: 19422
  path: "/metrics"

metrics:
  - source:
      mbean: "java.lang:type=Memory"
      attribute: HeapMemoryUsage
      path: used
    target: java_memory_heap_memory_usage_used
  - source:
      mbean: "java.lang:type=GarbageCollector,name=*"
      attribute: CollectionCount
    target: java_gc_collection_count
"#;

#[test]
fn test_help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--basic-auth-user"))
        .stdout(predicate::str::contains("--insecure"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

/// Test that a valid configuration is accepted via --validate flag
#[test]
fn test_validate_valid_config() {
    let file = create_temp_config(VALID_CONFIG);

    cmd()
        .arg("-c")
        .arg(file.path())
        .arg("--validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Metrics:      2"));
}

#[test]
fn test_validate_json_output() {
    let file = create_temp_config(VALID_CONFIG);

    cmd()
        .arg("-c")
        .arg(file.path())
        .arg("--validate")
        .arg("--output-format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""valid": true"#))
        .stdout(predicate::str::contains(r#""port": 19422"#));
}

#[test]
fn test_validate_json_config_file() {
    let config = r#"{
        "jolokia": {"url": "http://localhost:8778/jolokia"},
        "metrics": [
            {"source": {"mbean": "java.lang:type=Threading", "attribute": "ThreadCount"}, "target": "threads"}
        ]
    }"#;

    let file = create_temp_config_with_suffix(config, ".json");

    cmd()
        .arg("-c")
        .arg(file.path())
        .arg("--validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Metrics:      1"));
}

#[test]
fn test_invalid_yaml_is_rejected() {
    let file = create_temp_config("jolokia:\n  url: [not valid yaml\n");

    cmd()
        .arg("-c")
        .arg(file.path())
        .arg("--validate")
        .assert()
        .failure();
}

#[test]
fn test_missing_config_file() {
    cmd()
        .arg("-c")
        .arg("/nonexistent/path/config.yaml")
        .arg("--validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config"));
}

#[test]
fn test_invalid_port_zero() {
    let config = r#"
jolokia:
  url: "http://localhost:8778/jolokia"
server:
  port: 0
"#;

    let file = create_temp_config(config);

    cmd()
        .arg("-c")
        .arg(file.path())
        .arg("--validate")
        .assert()
        .failure();
}

#[test]
fn test_metrics_path_conflicting_with_health() {
    let config = r#"
server:
  path: "/health"
"#;

    let file = create_temp_config(config);

    cmd()
        .arg("-c")
        .arg(file.path())
        .arg("--validate")
        .assert()
        .failure();
}

#[test]
fn test_unsupported_url_scheme() {
    let file = create_temp_config(VALID_CONFIG);

    cmd()
        .arg("-c")
        .arg(file.path())
        .arg("--jolokia-url")
        .arg("ftp://localhost/jolokia")
        .arg("--validate")
        .assert()
        .failure();
}

#[test]
fn test_port_override() {
    let file = create_temp_config(VALID_CONFIG);

    cmd()
        .arg("-c")
        .arg(file.path())
        .arg("-p")
        .arg("19999")
        .arg("--validate")
        .assert()
        .success()
        .stdout(predicate::str::contains(":19999/metrics"));
}

/// Dry run prints the bulk request body and the canonical key table
#[test]
fn test_dry_run_text() {
    let file = create_temp_config(VALID_CONFIG);

    cmd()
        .arg("-c")
        .arg(file.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Request body (2 items):"))
        .stdout(predicate::str::contains(r#""type":"read""#))
        // key properties are sorted on load
        .stdout(predicate::str::contains("java.lang:name=*,type=GarbageCollector"))
        .stdout(predicate::str::contains(
            "java_lang_type_memory_heap_memory_usage_used -> java_memory_heap_memory_usage_used",
        ));
}

#[test]
fn test_dry_run_yaml() {
    let file = create_temp_config(VALID_CONFIG);

    cmd()
        .arg("-c")
        .arg(file.path())
        .arg("--dry-run")
        .arg("--output-format")
        .arg("yaml")
        .assert()
        .success()
        .stdout(predicate::str::contains("request:"))
        .stdout(predicate::str::contains("keys:"));
}
