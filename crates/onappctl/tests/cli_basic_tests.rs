use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command with no ambient profile or credentials
fn onappctl() -> Command {
    let mut cmd = Command::cargo_bin("onappctl").unwrap();
    cmd.env_remove("ONAPPCTL_PROFILE")
        .env_remove("ONAPPCTL_CONFIG_FILE")
        .env_remove("ONAPP_URL")
        .env_remove("ONAPP_USERNAME")
        .env_remove("ONAPP_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

/// Config file with one default profile pointing at `url`
fn config_for(dir: &TempDir, url: &str) -> PathBuf {
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            r#"
default_profile = "test"

[profiles.test]
url = "{url}"
username = "admin@example.com"
api_key = "secret-key"
"#
        ),
    )
    .unwrap();
    config_path
}

fn with_config(config_path: &PathBuf) -> Command {
    let mut cmd = onappctl();
    cmd.arg("--config-file").arg(config_path);
    cmd
}

#[test]
fn test_help_flag() {
    onappctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("OnApp control panel"))
        .stdout(predicate::str::contains("EXAMPLES:"));
}

#[test]
fn test_version_flag() {
    onappctl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("onappctl"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_command_json() {
    onappctl()
        .args(["version", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name": "onappctl""#));
}

#[test]
fn test_no_args_shows_help() {
    onappctl()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_subcommand() {
    onappctl()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_completions_bash() {
    onappctl()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("onappctl"));
}

#[test]
fn test_profile_lifecycle() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");

    with_config(&config_path)
        .args([
            "profile",
            "set",
            "prod",
            "--url",
            "https://cp.example.com",
            "--username",
            "admin@example.com",
            "--api-key",
            "0123456789abcdef",
            "--transaction-search-limit",
            "25",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile 'prod' saved"));

    let saved = fs::read_to_string(&config_path).unwrap();
    assert!(saved.contains("transaction_search_limit = 25"), "{saved}");

    with_config(&config_path)
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prod"))
        .stdout(predicate::str::contains("https://cp.example.com"));

    with_config(&config_path)
        .args(["profile", "show", "prod", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("****cdef"))
        .stdout(predicate::str::contains("0123456789abcdef").not());

    with_config(&config_path)
        .args(["profile", "default", "prod"])
        .assert()
        .success();
    let saved = fs::read_to_string(&config_path).unwrap();
    assert!(saved.contains(r#"default_profile = "prod""#), "{saved}");

    with_config(&config_path)
        .args(["profile", "remove", "prod"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Default profile cleared"));

    with_config(&config_path)
        .args(["profile", "list", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn test_profile_path_honours_config_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("custom.toml");

    with_config(&config_path)
        .args(["profile", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_show_unknown_profile_fails() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");

    with_config(&config_path)
        .args(["profile", "show", "missing"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Profile 'missing' not found"));
}

#[test]
fn test_api_command_without_profile_fails() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");

    with_config(&config_path)
        .args(["disk", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No profile configured"));
}

#[test]
fn test_corrupt_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[[[broken").unwrap();

    with_config(&config_path)
        .args(["profile", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_disk_list_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/settings/disks.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"disk": {"id": 1, "label": "root", "disk_size": 10}},
            {"disk": {"id": 2, "label": "data", "disk_size": 40}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config_path = config_for(&dir, &server.uri());

    let assert = with_config(&config_path)
        .args(["disk", "list", "-o", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let disks: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(disks[0]["label"], "root");
    assert_eq!(disks[1]["id"], 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_disk_list_table_with_total() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/settings/disks.json"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total", "11")
                .set_body_json(json!([{"disk": {"id": 11, "label": "swap"}}])),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config_path = config_for(&dir, &server.uri());

    with_config(&config_path)
        .args(["disk", "list", "--page", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LABEL"))
        .stdout(predicate::str::contains("swap"))
        .stdout(predicate::str::contains("Showing 1 of 11"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_transaction_list_with_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transactions.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"transaction": {"id": 3, "status": "failed"}},
            {"transaction": {"id": 4, "status": "complete"}}
        ])))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config_path = config_for(&dir, &server.uri());

    let assert = with_config(&config_path)
        .args(["transaction", "list", "-q", "[?status=='failed'].id"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let ids: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(ids, json!([3]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_role_delete_with_force() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/roles/7.json"))
        .and(query_param("force", "true"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config_path = config_for(&dir, &server.uri());

    with_config(&config_path)
        .args(["role", "delete", "7", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted role 7"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_id_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config_path = config_for(&dir, &server.uri());

    with_config(&config_path)
        .args(["disk", "delete", "0"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid input"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_disk_delete_reports_transaction() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/settings/disks/5.json"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/transactions.json"))
        .and(query_param("parent_id", "5"))
        .and(query_param("parent_type", "Disk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"transaction": {"id": 90, "action": "destroy_disk", "status": "pending"}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config_path = config_for(&dir, &server.uri());

    with_config(&config_path)
        .args(["disk", "delete", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted disk 5"))
        .stdout(predicate::str::contains("Transaction 90 (destroy_disk): pending"))
        .stdout(predicate::str::contains("onappctl transaction wait 90"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_disk_delete_and_wait() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/settings/disks/5.json"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/transactions.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"transaction": {"id": 90, "action": "destroy_disk", "status": "pending"}}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/transactions/90.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transaction": {"id": 90, "action": "destroy_disk", "status": "complete"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config_path = config_for(&dir, &server.uri());

    let assert = with_config(&config_path)
        .args(["disk", "delete", "5", "--wait", "--wait-interval", "0", "-o", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let deletion: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(deletion["parent"], json!({"parent_id": 5, "parent_type": "Disk"}));
    assert_eq!(deletion["transaction"]["status"], "complete");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_wait_on_failed_transaction_exits_nonzero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/transactions/41.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transaction": {"id": 41, "action": "destroy_backup", "status": "failed"}
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config_path = config_for(&dir, &server.uri());

    with_config(&config_path)
        .args(["transaction", "wait", "41", "--interval", "0"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("ended with status 'failed'"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/roles.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Access denied"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config_path = config_for(&dir, &server.uri());

    with_config(&config_path)
        .args(["role", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_file_ignores_environment_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/backups.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config_path = config_for(&dir, &server.uri());

    with_config(&config_path)
        .env("ONAPP_URL", "http://127.0.0.1:9")
        .env("ONAPP_USERNAME", "other")
        .env("ONAPP_API_KEY", "other")
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results"));
}
