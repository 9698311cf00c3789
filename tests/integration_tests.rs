//! Integration tests for the umlt CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BANK_DIAGRAM: &str = include_str!("fixtures/bank.gliffy");

/// Helper to get a umlt command
fn umlt() -> Command {
    Command::cargo_bin("umlt").unwrap()
}

/// Helper to create a test project in a temp directory
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    umlt().current_dir(tmp.path()).arg("init").assert().success();
    fs::write(tmp.path().join("diagrams/bank.gliffy"), BANK_DIAGRAM).unwrap();
    tmp
}

/// Helper to import the bank diagram into generated/uml/bank.json
fn import_bank(tmp: &TempDir) {
    umlt()
        .current_dir(tmp.path())
        .args(["import", "diagrams/bank.gliffy"])
        .assert()
        .success();
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    umlt()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("UML"))
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn test_version_displays() {
    umlt()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("umlt"));
}

#[test]
fn test_unknown_command_fails() {
    umlt()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_invalid_log_level_falls_back() {
    umlt()
        .args(["--log-level", "chatty", "completions", "bash"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Invalid log level: chatty"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_project_structure() {
    let tmp = TempDir::new().unwrap();

    umlt()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(tmp.path().join(".umlt/config.yaml").is_file());
    assert!(tmp.path().join(".umlt/templates").is_dir());
    assert!(tmp.path().join("diagrams").is_dir());
    assert!(tmp.path().join("jobs").is_dir());
    assert!(tmp.path().join("generated/uml").is_dir());
}

#[test]
fn test_init_twice_warns() {
    let tmp = setup_test_project();

    umlt()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

// ============================================================================
// Import Command Tests
// ============================================================================

#[test]
fn test_import_writes_model() {
    let tmp = setup_test_project();

    umlt()
        .current_dir(tmp.path())
        .args(["import", "diagrams/bank.gliffy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported"))
        .stdout(predicate::str::contains("com.acme.bank"));

    let model: serde_json::Value =
        serde_json::from_str(&read(tmp.path().join("generated/uml/bank.json"))).unwrap();
    assert_eq!(model["name"], "bank");
    assert_eq!(model["classes"][0]["name"], "Account");
    assert_eq!(model["classes"][0]["attributes"][1]["type"], "String");
    assert_eq!(model["classes"][0]["methods"][1]["parameters"][1]["name"], "y");
    assert_eq!(model["interfaces"][0]["name"], "Auditable");
    assert_eq!(model["interfaces"][0]["methods"][0]["name"], "audit");
    assert_eq!(model["defaultPackage"]["name"], "com.acme.bank");
}

#[test]
fn test_import_stdout_does_not_write() {
    let tmp = setup_test_project();

    umlt()
        .current_dir(tmp.path())
        .args(["import", "diagrams/bank.gliffy", "--stdout", "--name", "ledger"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"ledger\""));

    assert!(!tmp.path().join("generated/uml/ledger.json").exists());
}

#[test]
fn test_import_invalid_json_fails() {
    let tmp = setup_test_project();
    fs::write(tmp.path().join("diagrams/broken.gliffy"), "{\"stage\": ").unwrap();

    umlt()
        .current_dir(tmp.path())
        .args(["import", "diagrams/broken.gliffy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON syntax error"));
}

// ============================================================================
// Generate Command Tests
// ============================================================================

#[test]
fn test_generate_with_builtin_template() {
    let tmp = setup_test_project();
    import_bank(&tmp);

    umlt()
        .current_dir(tmp.path())
        .args(["generate", "generated/uml/bank.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 file(s) generated"));

    let code = read(tmp.path().join("generated/src/main/java/com/acme/bank/Account.java"));
    assert!(code.contains("package com.acme.bank;"));
    assert!(code.contains("public class Account {"));
    assert!(!code.contains("${@iterate"));
}

#[test]
fn test_generate_with_project_template() {
    let tmp = setup_test_project();
    import_bank(&tmp);
    fs::write(
        tmp.path().join(".umlt/templates/record.java"),
        "package ${definition.package.name};\n\
         \n\
         public class ${definition.name} {\n\
         \x20   private ${definition.attributes.0.type} ${definition.attributes.0.name};\n\
         \x20   private ${definition.attributes.1.type} ${definition.attributes.1.name};\n\
         }${@optional definition.superClass}\n",
    )
    .unwrap();

    umlt()
        .current_dir(tmp.path())
        .args(["generate", "generated/uml/bank.json", "-t", "record"])
        .assert()
        .success();

    let code = read(tmp.path().join("generated/src/main/java/com/acme/bank/Account.java"));
    insta::assert_snapshot!(code.trim_end(), @r"
package com.acme.bank;

public class Account {
    private double balance;
    private String owner;
}
");
}

#[test]
fn test_generate_interfaces_with_tera() {
    let tmp = setup_test_project();
    import_bank(&tmp);

    umlt()
        .current_dir(tmp.path())
        .args([
            "generate",
            "generated/uml/bank.json",
            "--target",
            "interface",
            "--exporter",
            "tera",
        ])
        .assert()
        .success();

    let code = read(tmp.path().join("generated/src/main/java/com/acme/bank/Auditable.java"));
    assert!(code.contains("interface Auditable"));
    assert!(code.contains("audit()"));
}

#[test]
fn test_generate_unknown_template_fails() {
    let tmp = setup_test_project();
    import_bank(&tmp);

    umlt()
        .current_dir(tmp.path())
        .args(["generate", "generated/uml/bank.json", "-t", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template not found"));
}

#[test]
fn test_generate_rejects_attribute_target() {
    let tmp = setup_test_project();
    import_bank(&tmp);

    umlt()
        .current_dir(tmp.path())
        .args(["generate", "generated/uml/bank.json", "--target", "attribute"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a renderable target"));
}

// ============================================================================
// Job Command Tests
// ============================================================================

const BUILD_JOB: &str = r#"{
    "name": "build",
    "parameters": { "src": "src/main/java" },
    "importSteps": [
        { "name": "bank", "source": "diagrams/bank.gliffy" }
    ],
    "exportSteps": [
        {
            "name": "classes",
            "templateName": "classTemplate",
            "fileExtension": "java",
            "path": "${src}",
            "package": { "name": "${pkg}" }
        }
    ]
}"#;

#[test]
fn test_job_runs_import_then_export() {
    let tmp = setup_test_project();
    fs::write(tmp.path().join("jobs/build.json"), BUILD_JOB).unwrap();

    umlt()
        .current_dir(tmp.path())
        .args(["job", "jobs/build.json", "--param", "pkg=org.example"])
        .assert()
        .success()
        .stdout(predicate::str::contains("imported model 'bank'"))
        .stdout(predicate::str::contains("rendered 1 file(s)"));

    assert!(tmp.path().join("generated/uml/bank.json").is_file());
    let code = read(tmp.path().join("generated/src/main/java/org/example/Account.java"));
    assert!(code.contains("package org.example;"));
}

#[test]
fn test_job_reads_parameters_from_config() {
    let tmp = setup_test_project();
    fs::write(tmp.path().join("jobs/build.json"), BUILD_JOB).unwrap();

    umlt()
        .current_dir(tmp.path())
        .args(["config", "set", "parameters.pkg", "net.config"])
        .assert()
        .success();

    umlt()
        .current_dir(tmp.path())
        .args(["job", "jobs/build.json"])
        .assert()
        .success();

    assert!(tmp
        .path()
        .join("generated/src/main/java/net/config/Account.java")
        .is_file());
}

#[test]
fn test_job_json_report() {
    let tmp = setup_test_project();
    fs::write(tmp.path().join("jobs/build.json"), BUILD_JOB).unwrap();

    let output = umlt()
        .current_dir(tmp.path())
        .args(["-f", "json", "job", "jobs/build.json", "--param", "pkg=a.b"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let outcomes: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcomes[0]["phase"], "import");
    assert_eq!(outcomes[0]["status"], "succeeded");
    assert_eq!(outcomes[1]["phase"], "export");
    assert_eq!(outcomes[1]["step"], "classes");
}

#[test]
fn test_job_dry_run_shows_unresolved_marker() {
    let tmp = setup_test_project();
    fs::write(tmp.path().join("jobs/build.json"), BUILD_JOB).unwrap();

    umlt()
        .current_dir(tmp.path())
        .args(["job", "jobs/build.json", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"path\": \"src/main/java\""))
        .stdout(predicate::str::contains("not-found"));

    assert!(!tmp.path().join("generated/uml/bank.json").exists());
}

#[test]
fn test_job_failing_step_reports_and_continues() {
    let tmp = setup_test_project();
    fs::write(
        tmp.path().join("jobs/partial.json"),
        r#"{
            "importSteps": [
                { "name": "missing", "source": "diagrams/nope.gliffy" },
                { "name": "bank", "source": "diagrams/bank.gliffy" }
            ],
            "exportSteps": []
        }"#,
    )
    .unwrap();

    umlt()
        .current_dir(tmp.path())
        .args(["job", "jobs/partial.json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("✗"))
        .stdout(predicate::str::contains("✓"))
        .stderr(predicate::str::contains("1 of 2 step(s) failed"));

    assert!(tmp.path().join("generated/uml/bank.json").is_file());
}

#[test]
fn test_job_malformed_document_fails() {
    let tmp = setup_test_project();
    fs::write(tmp.path().join("jobs/bad.json"), "{ \"importSteps\": [ }").unwrap();

    umlt()
        .current_dir(tmp.path())
        .args(["job", "jobs/bad.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON syntax error"));
}

// ============================================================================
// Show / Validate / Templates Tests
// ============================================================================

#[test]
fn test_show_markdown_and_json() {
    let tmp = setup_test_project();
    import_bank(&tmp);

    umlt()
        .current_dir(tmp.path())
        .args(["show", "generated/uml/bank.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## class Account"))
        .stdout(predicate::str::contains("compute(x: int, y: int)"));

    umlt()
        .current_dir(tmp.path())
        .args(["show", "generated/uml/bank.json", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"defaultPackage\""));
}

#[test]
fn test_validate_project_files() {
    let tmp = setup_test_project();
    import_bank(&tmp);
    fs::write(tmp.path().join("jobs/build.json"), BUILD_JOB).unwrap();

    umlt()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("All files passed"));
}

#[test]
fn test_validate_reports_schema_violation() {
    let tmp = setup_test_project();
    fs::write(
        tmp.path().join("jobs/bad.json"),
        r#"{ "exportSteps": [ { "name": "x", "templateName": "classTemplate" } ] }"#,
    )
    .unwrap();

    umlt()
        .current_dir(tmp.path())
        .args(["validate", "jobs/bad.json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("error(s)"));
}

#[test]
fn test_templates_list_and_print() {
    let tmp = setup_test_project();
    fs::write(tmp.path().join(".umlt/templates/record.rs"), "struct ${definition.name};").unwrap();

    umlt()
        .current_dir(tmp.path())
        .arg("templates")
        .assert()
        .success()
        .stdout(predicate::str::contains("classTemplate.java"))
        .stdout(predicate::str::contains("record.rs"))
        .stdout(predicate::str::contains("project"));

    umlt()
        .current_dir(tmp.path())
        .args(["templates", "interfaceTemplate.java"])
        .assert()
        .success()
        .stdout(predicate::str::contains("public interface ${definition.name}"));
}

// ============================================================================
// Config / Completions Tests
// ============================================================================

#[test]
fn test_config_set_and_show() {
    let tmp = setup_test_project();

    umlt()
        .current_dir(tmp.path())
        .args(["config", "set", "output_dir", "build"])
        .assert()
        .success();

    umlt()
        .current_dir(tmp.path())
        .args(["config", "show", "output_dir"])
        .assert()
        .success()
        .stdout(predicate::str::contains("build"));

    umlt()
        .current_dir(tmp.path())
        .args(["config", "set", "editor", "vim"])
        .assert()
        .failure();
}

#[test]
fn test_completions_bash() {
    umlt()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("umlt"));
}
