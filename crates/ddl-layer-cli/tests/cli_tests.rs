//! CLI integration tests for ddl-layer.
//!
//! These tests verify argument parsing, help output, exit codes for error
//! conditions, and a full SQLite lifecycle against a temporary directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::path::Path;

/// Get a command for the ddl-layer binary.
fn cmd() -> Command {
    Command::cargo_bin("ddl-layer").unwrap()
}

/// Write a SQLite config with an Items and a Widgets table into `dir`.
fn sqlite_config(dir: &Path) -> std::path::PathBuf {
    let db = dir.join("inventory.db");
    let config = dir.join("ddl.yaml");
    let yaml = format!(
        r#"
connection:
  type: sqlite
  path: "{}"
tables:
  - name: Items
    columns:
      - name: Id
        type: int64
        autonumber: true
      - name: Payload
        type: bytes
  - name: Widgets
    columns:
      - name: Code
        type: string
        max_length: 12
        primary_key: true
      - name: Weight
        type: float64
"#,
        db.display()
    );
    std::fs::write(&config, yaml).unwrap();
    config
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("create-store"))
        .stdout(predicate::str::contains("drop-store"))
        .stdout(predicate::str::contains("create-tables"))
        .stdout(predicate::str::contains("drop-tables"))
        .stdout(predicate::str::contains("types"))
        .stdout(predicate::str::contains("sequence"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ddl-layer"));
}

#[test]
fn test_global_flags_listed() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--output-json"))
        .stdout(predicate::str::contains("--log-format"))
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("[default: ddl.yaml]"));
}

#[test]
fn test_no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

// =============================================================================
// Exit Code Tests
// =============================================================================

#[test]
fn test_missing_config_exits_with_io_code() {
    cmd()
        .args(["--config", "nonexistent_config_file.yaml", "status"])
        .assert()
        .code(5);
}

#[test]
fn test_invalid_yaml_exits_with_config_code() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "invalid: yaml: content: [").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "status"])
        .assert()
        .code(2);
}

#[test]
fn test_empty_config_exits_with_config_code() {
    let file = tempfile::NamedTempFile::new().unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "status"])
        .assert()
        .code(2);
}

#[test]
fn test_unknown_backend_exits_with_config_code() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "connection:").unwrap();
    writeln!(file, "  type: oracle").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "status"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown database type"));
}

#[test]
fn test_unknown_table_in_ddl() {
    let dir = tempfile::tempdir().unwrap();
    let config = sqlite_config(dir.path());

    cmd()
        .args(["--config", config.to_str().unwrap(), "ddl", "--table", "Nope"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not configured"));
}

// =============================================================================
// Types Command
// =============================================================================

#[test]
fn test_types_needs_no_config() {
    cmd()
        .args(["--config", "nonexistent.yaml", "types"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sqlite"))
        .stdout(predicate::str::contains("mssql"))
        .stdout(predicate::str::contains("UNIQUEIDENTIFIER"));
}

#[test]
fn test_types_single_backend_json() {
    cmd()
        .args(["--output-json", "types", "--backend", "pg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"postgres\": \"BYTEA\""))
        .stdout(predicate::str::contains("mysql").not());
}

#[test]
fn test_types_unknown_backend() {
    cmd()
        .args(["types", "--backend", "oracle"])
        .assert()
        .code(2);
}

// =============================================================================
// SQLite Lifecycle
// =============================================================================

#[test]
fn test_ddl_prints_statements_without_a_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = sqlite_config(dir.path());

    cmd()
        .args(["--config", config.to_str().unwrap(), "ddl"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"Id\" INTEGER PRIMARY KEY AUTOINCREMENT",
        ))
        .stdout(predicate::str::contains("PRIMARY KEY (\"Code\")"));

    assert!(!dir.path().join("inventory.db").exists());
}

#[test]
fn test_sqlite_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let config = sqlite_config(dir.path());
    let config = config.to_str().unwrap();
    let db = dir.path().join("inventory.db");

    cmd()
        .args(["--config", config, "--output-json", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"storage_unit_exists\": false"));

    cmd()
        .args(["--config", config, "create-store"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create-store: done"));
    assert!(db.exists());

    cmd()
        .args(["--config", config, "create-store"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to do"));

    cmd()
        .args(["--config", config, "--output-json", "create-tables"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Items\""))
        .stdout(predicate::str::contains("\"Widgets\""));

    cmd()
        .args(["--config", config, "create-tables"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tables created: 0"))
        .stdout(predicate::str::contains("Tables already present: Items, Widgets"));

    cmd()
        .args(["--config", config, "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Table Items: present"))
        .stdout(predicate::str::contains("Table Widgets: present"));

    cmd()
        .args(["--config", config, "sequence", "Items"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sequence Items: missing"));

    cmd()
        .args(["--config", config, "drop-tables"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tables dropped: 2"));

    cmd()
        .args(["--config", config, "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Table Items: missing"));

    cmd()
        .args(["--config", config, "drop-store"])
        .assert()
        .success();
    assert!(!db.exists());

    // Dropping again is a no-op
    cmd()
        .args(["--config", config, "drop-store"])
        .assert()
        .success();
}

#[test]
fn test_sequence_on_absent_store_reports_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config = sqlite_config(dir.path());

    cmd()
        .args(["--config", config.to_str().unwrap(), "sequence", "Items"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sequence Items: missing"));

    assert!(!dir.path().join("inventory.db").exists());
}
