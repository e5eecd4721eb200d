use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn books_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("books"));
    cmd.env_remove("BOOKS_LOG")
        .env_remove("BOOKS_DATABASE_URL")
        .env_remove("BOOKS_API_KEY")
        .env_remove("BOOKS_ACCESS_TOKEN");
    cmd
}

fn init_config(config_path: &Path) {
    books_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();
}

fn write_config(config_path: &Path, content: &str) {
    fs::create_dir_all(config_path).unwrap();
    fs::write(config_path.join("config.toml"), content).unwrap();
}

#[test]
fn test_help() {
    books_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Small business accounting reports over a hosted database",
        ));
}

#[test]
fn test_version() {
    books_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("books"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("books-config");

    books_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized books config"));

    let content = fs::read_to_string(config_path.join("config.toml")).unwrap();
    assert!(content.contains("[database]"));
    assert!(content.contains("[report]"));
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("books-config");

    init_config(&config_path);

    books_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_status_without_init() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    books_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_status() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("books-config");

    init_config(&config_path);

    books_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Books Status"))
        .stdout(predicate::str::contains("https://your-project.supabase.co"))
        .stdout(predicate::str::contains("your-anon-key").not());
}

#[test]
fn test_status_warns_without_database() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("books-config");
    write_config(&config_path, "[report]\ntop_n = 3\n");

    books_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(not set)"))
        .stderr(predicate::str::contains("Warning:"));
}

#[test]
fn test_env_overrides_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("books-config");

    init_config(&config_path);

    books_cmd()
        .env("BOOKS_DATABASE_URL", "https://override.example.com")
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://override.example.com"));
}

#[test]
fn test_broken_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("books-config");
    write_config(&config_path, "[database\nurl = ");

    books_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_report_invalid_date() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("books-config");

    init_config(&config_path);

    books_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "report",
            "--from",
            "2024-13-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date '2024-13-01'"));
}

#[test]
fn test_report_inverted_range() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("books-config");

    init_config(&config_path);

    books_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "report",
            "--from",
            "2024-03-31",
            "--to",
            "2024-03-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("2024-03-31 is after 2024-03-01"));
}

#[test]
fn test_report_zero_top() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("books-config");

    init_config(&config_path);

    books_cmd()
        .args(["-C", config_path.to_str().unwrap(), "report", "--top", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn test_dashboard_invalid_today() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("books-config");

    init_config(&config_path);

    books_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "dashboard",
            "--today",
            "yesterday",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date 'yesterday'"));
}

#[test]
fn test_list_unknown_table() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("books-config");

    init_config(&config_path);

    books_cmd()
        .args(["-C", config_path.to_str().unwrap(), "list", "payments"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown table 'payments'"))
        .stderr(predicate::str::contains("invoice_items"));
}

#[test]
fn test_report_requires_api_key() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("books-config");
    write_config(
        &config_path,
        "[database]\nurl = \"https://demo.supabase.co\"\n",
    );

    books_cmd()
        .args(["-C", config_path.to_str().unwrap(), "report"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing setting 'database.api_key'"));
}

#[test]
fn test_unreachable_database() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("books-config");
    write_config(
        &config_path,
        "[database]\nurl = \"http://127.0.0.1:9\"\napi_key = \"anon\"\ntimeout_secs = 2\n",
    );

    books_cmd()
        .args(["-C", config_path.to_str().unwrap(), "dashboard"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Database request failed"));
}

#[test]
fn test_errors_are_printed_once_without_verbose() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("books-config");

    init_config(&config_path);

    books_cmd()
        .args(["-C", config_path.to_str().unwrap(), "report", "--top", "0"])
        .assert()
        .failure()
        .stderr("Error: Top-N must be at least 1\n");
}

#[test]
fn test_verbose_logs_errors_to_stderr() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("books-config");

    init_config(&config_path);

    books_cmd()
        .args(["-C", config_path.to_str().unwrap(), "-v", "report", "--top", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR"))
        .stderr(predicate::str::contains("Error: Top-N must be at least 1"));
}
