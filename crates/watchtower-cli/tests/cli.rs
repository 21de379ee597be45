use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_config(dir: &Path, extra: &str) -> PathBuf {
    let path = dir.join("watchtower.toml");
    let body = format!(
        "[watchtower]\n\
         log_directory = '{}'\n\
         time_format = 'Y-m-d H:i:s'\n\
         streams = [\"errors\", \"alerts\"]\n\
         {}\n",
        dir.join("logs").display(),
        extra
    );
    fs::write(&path, body).unwrap();
    path
}

fn watchtower(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("watchtower").unwrap();
    cmd.current_dir(dir)
        .env_remove("WATCHTOWER_CONFIG")
        .env_remove("WATCHTOWER_HOST")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn init_creates_stream_files() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(tmp.path(), "notify_recipients = []");

    watchtower(tmp.path())
        .arg("--config")
        .arg(&config)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Log store ready"));

    assert!(tmp.path().join("logs/errors.log").is_file());
    assert!(tmp.path().join("logs/alerts.log").is_file());

    watchtower(tmp.path())
        .arg("--config")
        .arg(&config)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already up to date"));
}

#[test]
fn log_appends_entry() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(tmp.path(), "notify_recipients = []");

    watchtower(tmp.path())
        .arg("--config")
        .arg(&config)
        .args(["log", "errors", "disk", "full"])
        .assert()
        .success();

    let content = fs::read_to_string(tmp.path().join("logs/errors.log")).unwrap();
    assert!(content.ends_with(" - disk full\n\n"));
    assert_eq!(content.matches("\n\n").count(), 1);
}

#[test]
fn config_is_found_in_working_directory() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path(), "notify_recipients = []");

    watchtower(tmp.path())
        .args(["log", "alerts", "hello"])
        .assert()
        .success();

    let content = fs::read_to_string(tmp.path().join("logs/alerts.log")).unwrap();
    assert!(content.ends_with(" - hello\n\n"));
}

#[test]
fn check_rejects_missing_streams() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("watchtower.toml");
    fs::write(
        &config,
        format!(
            "[watchtower]\nlog_directory = '{}'\nnotify_recipients = []\n",
            tmp.path().join("logs").display()
        ),
    )
    .unwrap();

    watchtower(tmp.path())
        .arg("--config")
        .arg(&config)
        .arg("check")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid streams"));

    assert!(!tmp.path().join("logs").exists());
}

#[test]
fn check_reports_missing_section() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("watchtower.toml");
    fs::write(&config, "[other]\nkey = 1\n").unwrap();

    watchtower(tmp.path())
        .arg("--config")
        .arg(&config)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No WatchTower configuration"));
}

#[test]
fn notify_without_recipients_succeeds() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(tmp.path(), "notify_recipients = []");

    watchtower(tmp.path())
        .arg("--config")
        .arg(&config)
        .args(["log", "--notify", "alerts", "critical"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged to"));

    let content = fs::read_to_string(tmp.path().join("logs/alerts.log")).unwrap();
    assert!(content.ends_with(" - critical\n\n"));
}

#[cfg(unix)]
#[test]
fn failed_notification_keeps_entry() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(
        tmp.path(),
        "notify_recipients = [\"ops@example.com\"]\n\n[watchtower.mail]\nsendmail = '/bin/false'",
    );

    watchtower(tmp.path())
        .arg("--config")
        .arg(&config)
        .args(["log", "--notify", "alerts", "critical"])
        .assert()
        .success()
        .stderr(predicate::str::contains("notification failed"));

    let content = fs::read_to_string(tmp.path().join("logs/alerts.log")).unwrap();
    assert!(content.ends_with(" - critical\n\n"));
}

#[test]
fn tail_shows_latest_entries() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(tmp.path(), "notify_recipients = []");

    for msg in ["one", "two", "three"] {
        watchtower(tmp.path())
            .arg("--config")
            .arg(&config)
            .args(["log", "errors", msg])
            .assert()
            .success();
    }

    watchtower(tmp.path())
        .arg("--config")
        .arg(&config)
        .args(["tail", "errors", "-n", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- two"))
        .stdout(predicate::str::contains("- three"))
        .stdout(predicate::str::contains("- one").not());
}

#[test]
fn streams_lists_declared_streams_as_json() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(tmp.path(), "notify_recipients = []");

    watchtower(tmp.path())
        .arg("--config")
        .arg(&config)
        .arg("init")
        .assert()
        .success();

    watchtower(tmp.path())
        .arg("--config")
        .arg(&config)
        .args(["--json", "streams"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"exists\": true"))
        .stdout(predicate::str::contains("\"name\": \"errors\""))
        .stdout(predicate::str::contains("\"name\": \"alerts\""));
}

#[test]
fn log_rejects_path_traversal() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(tmp.path(), "notify_recipients = []");

    watchtower(tmp.path())
        .arg("--config")
        .arg(&config)
        .args(["log", "../escape", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid stream name"));
}

#[test]
fn streams_does_not_create_store() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(tmp.path(), "notify_recipients = []");

    watchtower(tmp.path())
        .arg("--config")
        .arg(&config)
        .args(["--json", "streams"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"exists\": false"))
        .stdout(predicate::str::contains("\"exists\": true").not());

    assert!(!tmp.path().join("logs").exists());
}

#[test]
fn malformed_config_in_working_directory_is_reported() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("watchtower.toml"), "[watchtower\nstreams = ").unwrap();

    watchtower(tmp.path())
        .arg("check")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to load"))
        .stderr(predicate::str::contains("TOML parse error"))
        .stderr(predicate::str::contains("No config file found").not());
}
