//! CLI integration tests for schemagen.
//!
//! These tests verify command-line argument parsing, help output,
//! generated files and exit codes for various error conditions.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

/// Get a command for the schemagen binary.
fn cmd() -> Command {
    Command::cargo_bin("schemagen").unwrap()
}

const PERSON_SCHEMA: &str = r#"
name: shop
tables:
  - name: person
    sequences: [person_seq]
    columns:
      - { name: id, type: INTEGER, primary_key: true }
      - { name: name, type: VARCHAR, nullable: true, length: 100 }
      - { name: age, type: 5, nullable: true }
views:
  - name: person_view
    columns:
      - { name: id, type: INTEGER }
"#;

/// Write `config.yaml` and `schema.yaml` into a fresh temp dir.
fn project(schema: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out");
    fs::write(dir.path().join("schema.yaml"), schema).unwrap();
    fs::write(
        dir.path().join("config.yaml"),
        format!(
            "schema: schema.yaml\noutput:\n  dir: {}\n  package_base: com.example\nruntime:\n  workers: 2\n",
            output.display()
        ),
    )
    .unwrap();
    dir
}

fn config_arg(dir: &Path) -> String {
    dir.join("config.yaml").to_str().unwrap().to_string()
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
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("types"));
}

#[test]
fn test_generate_subcommand_help() {
    cmd()
        .args(["generate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--fail-fast"))
        .stdout(predicate::str::contains("--workers"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("schemagen"));
}

#[test]
fn test_defaults_in_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: config.yaml]"))
        .stdout(predicate::str::contains("[default: text]"))
        .stdout(predicate::str::contains("[default: info]"));
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
fn test_missing_config_exits_with_code_7() {
    cmd()
        .args(["--config", "nonexistent_config_file.yaml", "generate"])
        .assert()
        .code(7); // EXIT_IO_ERROR - file not found
}

#[test]
fn test_invalid_yaml_exits_with_code_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "invalid: yaml: content: [").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "generate"])
        .assert()
        .code(1); // EXIT_CONFIG_ERROR
}

#[test]
fn test_missing_package_exits_with_code_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "schema: schema.yaml").unwrap();
    writeln!(file, "output:").unwrap();
    writeln!(file, "  dir: out").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "validate"])
        .assert()
        .code(1); // EXIT_CONFIG_ERROR
}

#[test]
fn test_zero_workers_override_exits_with_code_1() {
    let dir = project(PERSON_SCHEMA);
    cmd()
        .args(["--config", &config_arg(dir.path()), "generate", "--workers", "0"])
        .assert()
        .code(1);
}

#[test]
fn test_duplicate_tables_exit_with_code_2() {
    let dir = project(
        r#"
name: shop
tables:
  - name: person
  - name: person
"#,
    );

    cmd()
        .args(["--config", &config_arg(dir.path()), "generate"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Table named [person] already exists in database [shop]",
        ));
}

#[test]
fn test_malformed_schema_exits_with_code_2() {
    let dir = project("tables: [");

    cmd()
        .args(["--config", &config_arg(dir.path()), "validate"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Schema document error"));
}

#[test]
fn test_unknown_column_type_fails_generation() {
    let dir = project(
        r#"
name: shop
tables:
  - name: person
    columns:
      - { name: shape, type: GEOMETRY }
"#,
    );

    cmd()
        .args(["--config", &config_arg(dir.path()), "generate"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains(
            "person FAILED: No type mapping for column kind UNKNOWN",
        ));
}

#[test]
fn test_unsupported_column_exits_with_code_3() {
    let dir = project(
        r#"
name: shop
tables:
  - name: ledger
    columns:
      - { name: total, type: MONEY }
  - name: person
    columns:
      - { name: id, type: INTEGER }
"#,
    );

    cmd()
        .args(["--config", &config_arg(dir.path()), "generate"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("ledger FAILED: Unsupported column kind MONEY"));

    assert!(dir.path().join("out/com/example/Person.java").exists());
}

#[test]
fn test_case_only_table_names_fail_second_table() {
    let dir = project(
        r#"
name: bank
tables:
  - name: Account
    columns:
      - { name: id, type: INTEGER }
  - name: account
    columns:
      - { name: id, type: BIGINT }
"#,
    );

    cmd()
        .args(["--config", &config_arg(dir.path()), "generate"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains(
            "account FAILED: Emitter failed for table account: class Account is already generated for [Account]",
        ))
        .stdout(predicate::str::contains("Files: 1"));

    let account = fs::read_to_string(dir.path().join("out/com/example/Account.java")).unwrap();
    assert!(account.contains("private int id;"));
}

// =============================================================================
// Generate Tests
// =============================================================================

#[test]
fn test_generate_writes_entities() {
    let dir = project(PERSON_SCHEMA);

    cmd()
        .args(["--config", &config_arg(dir.path()), "generate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generation completed!"))
        .stdout(predicate::str::contains("Files: 2"));

    let person = fs::read_to_string(dir.path().join("out/com/example/Person.java")).unwrap();
    assert!(person.contains("package com.example;"));
    assert!(person.contains("private int id;"));
    assert!(person.contains("private String name;"));
    assert!(person.contains("private Integer age;"));
    assert!(person.contains("@Column(name = \"name\", length = 100)"));

    let view = fs::read_to_string(dir.path().join("out/com/example/PersonView.java")).unwrap();
    assert!(view.contains("@Immutable"));
    assert!(!view.contains("public void set"));
}

#[test]
fn test_generate_dry_run_writes_nothing() {
    let dir = project(PERSON_SCHEMA);

    cmd()
        .args(["--config", &config_arg(dir.path()), "generate", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run completed!"));

    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_generate_output_json() {
    let dir = project(PERSON_SCHEMA);

    let output = cmd()
        .args([
            "--config",
            &config_arg(dir.path()),
            "--output-json",
            "generate",
            "--dry-run",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["status"], "completed");
    assert_eq!(report["tables_processed"], 2);
    assert_eq!(report["files_generated"], 2);
    assert_eq!(report["artifacts"][0]["table"], "person");
    assert_eq!(report["artifacts"][1]["table"], "person_view");
}

#[test]
fn test_generate_output_dir_override() {
    let dir = project(PERSON_SCHEMA);
    let other = TempDir::new().unwrap();

    cmd()
        .args([
            "--config",
            &config_arg(dir.path()),
            "generate",
            "--output-dir",
            other.path().to_str().unwrap(),
        ])
        .assert()
        .success();

    assert!(other.path().join("com/example/Person.java").exists());
}

// =============================================================================
// Validate and Types Tests
// =============================================================================

#[test]
fn test_validate_valid_schema() {
    let dir = project(PERSON_SCHEMA);

    cmd()
        .args(["--config", &config_arg(dir.path()), "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema [shop] is valid: 1 tables, 1 views"));
}

#[test]
fn test_validate_all_lists_every_violation() {
    let dir = project(
        r#"
name: shop
tables:
  - name: a
    sequences: [s]
  - name: b
    sequences: [s]
  - name: a
views:
  - name: b
"#,
    );

    cmd()
        .args(["--config", &config_arg(dir.path()), "validate", "--all"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("3 violation(s)"))
        .stdout(predicate::str::contains("Sequence named [s]"))
        .stdout(predicate::str::contains("Table named [a]"))
        .stdout(predicate::str::contains("View named [b]"));
}

#[test]
fn test_types_prints_mapping_without_config() {
    cmd()
        .args(["--config", "nonexistent_config_file.yaml", "types"])
        .assert()
        .success()
        .stdout(predicate::str::contains("KIND"))
        .stdout(predicate::str::contains("SMALLINT"))
        .stdout(predicate::str::contains("Integer"))
        .stdout(predicate::str::contains("Unsupported column kind MONEY"));
}
