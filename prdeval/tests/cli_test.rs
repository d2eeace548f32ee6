//! CLI integration tests for prdeval
//!
//! Every case stops before a provider call, so no network is needed.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const GENERATOR_KEY: &str = "PRDEVAL_TEST_GENERATOR_KEY";
const EVALUATOR_KEY: &str = "PRDEVAL_TEST_EVALUATOR_KEY";

/// prdeval running in an empty temp dir with no inherited environment
fn prdeval(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("prdeval").expect("binary should build");
    cmd.current_dir(dir)
        .env_clear()
        .env("HOME", dir)
        .env("XDG_DATA_HOME", dir.join("data"))
        .env("XDG_CONFIG_HOME", dir.join("config"));
    cmd
}

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("prdeval.yml");
    let yaml = format!(
        "generator:\n  api-key-env: {}\nevaluator:\n  api-key-env: {}\n",
        GENERATOR_KEY, EVALUATOR_KEY
    );
    fs::write(&path, yaml).expect("Failed to write config");
    path
}

fn write_task(dir: &Path, json: &str) -> std::path::PathBuf {
    let path = dir.join("task.json");
    fs::write(&path, json).expect("Failed to write task");
    path
}

const TASK: &str = r#"{
    "title": "Implement User Registration Feature",
    "description": "Allow new users to create an account with email and password",
    "parent": {"title": "User Management Epic", "description": "Accounts and profiles"}
}"#;

#[test]
fn test_help_lists_commands() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    prdeval(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("evaluate"))
        .stdout(predicate::str::contains("prompts"))
        .stdout(predicate::str::contains("Logs are written to"));
}

#[test]
fn test_prompts_lists_embedded_catalog() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    prdeval(temp.path())
        .arg("prompts")
        .assert()
        .success()
        .stdout(predicate::str::contains("Catalog: <embedded>"))
        .stdout(predicate::str::contains("enrich_task"))
        .stdout(predicate::str::contains("styles: comprehensive, concise"))
        .stdout(predicate::str::contains("evaluate_content"));
}

#[test]
fn test_prompts_with_custom_catalog() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let catalog = temp.path().join("custom.json");
    fs::write(
        &catalog,
        r#"{
            "content_generation": {
                "system_prompts": {"release_notes": {"short": "Be brief.", "long": "Be thorough."}},
                "user_prompt_templates": {
                    "release_notes": {"template": "Notes for {{task_title}}", "description": "Release notes"}
                }
            }
        }"#,
    )
    .expect("Failed to write catalog");

    prdeval(temp.path())
        .arg("prompts")
        .arg("--prompts")
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.json"))
        .stdout(predicate::str::contains("release_notes"))
        .stdout(predicate::str::contains("styles: long, short"))
        .stdout(predicate::str::contains("Release notes"))
        .stdout(predicate::str::contains("enrich_task").not());
}

#[test]
fn test_prompts_with_missing_catalog_fails() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    prdeval(temp.path())
        .args(["prompts", "--prompts", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load prompt catalog"));
}

#[test]
fn test_generate_without_api_key_names_variable() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(temp.path());
    let task = write_task(temp.path(), TASK);

    prdeval(temp.path())
        .arg("generate")
        .arg(&task)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains(GENERATOR_KEY));
}

#[test]
fn test_generate_with_blank_title_fails_before_request() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(temp.path());
    let task = write_task(temp.path(), r#"{"title": "  ", "description": "Something"}"#);

    prdeval(temp.path())
        .arg("generate")
        .arg(&task)
        .arg("--config")
        .arg(&config)
        .env(GENERATOR_KEY, "test-key")
        .env(EVALUATOR_KEY, "test-key")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Required field is empty: title"));
}

#[test]
fn test_generate_with_unknown_style_fails_before_request() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(temp.path());
    let task = write_task(temp.path(), TASK);

    prdeval(temp.path())
        .arg("generate")
        .arg(&task)
        .args(["--style", "poetic"])
        .arg("--config")
        .arg(&config)
        .env(GENERATOR_KEY, "test-key")
        .env(EVALUATOR_KEY, "test-key")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No 'poetic' system prompt"));
}

#[test]
fn test_generate_with_malformed_task_fails() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let task = write_task(temp.path(), r#"{"title": "Only a title"}"#);

    prdeval(temp.path())
        .arg("generate")
        .arg(&task)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse task JSON"));
}

#[test]
fn test_run_validates_both_keys() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(temp.path());
    let task = write_task(temp.path(), TASK);

    prdeval(temp.path())
        .arg("run")
        .arg(&task)
        .arg("--config")
        .arg(&config)
        .env(GENERATOR_KEY, "test-key")
        .assert()
        .failure()
        .stderr(predicate::str::contains(EVALUATOR_KEY));
}

#[test]
fn test_evaluate_rejects_unknown_format() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    prdeval(temp.path())
        .args(["evaluate", "prd.md", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown format"));
}

#[test]
fn test_evaluate_rejects_two_stdin_inputs() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    prdeval(temp.path())
        .args(["evaluate", "-", "--task", "-"])
        .write_stdin("# PRD")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot both read from stdin"));
}
