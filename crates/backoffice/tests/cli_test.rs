//! Integration tests for the `backoffice` CLI binary.
//!
//! Argument parsing, help output and error handling run without a backend;
//! the resource commands run against a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `backoffice` binary with env isolation.
///
/// Clears all `BACKOFFICE_*` env vars and points config directories at
/// `home` so tests never touch the user's real configuration.
fn backoffice_cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("backoffice");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("BACKOFFICE_PROFILE")
        .env_remove("BACKOFFICE_BASE_URL")
        .env_remove("BACKOFFICE_TOKEN")
        .env_remove("BACKOFFICE_OUTPUT")
        .env_remove("BACKOFFICE_INSECURE")
        .env_remove("BACKOFFICE_TIMEOUT")
        .env_remove("BACKOFFICE_PASSWORD")
        .env_remove("BACKOFFICE_DEFAULT_PROFILE")
        .env_remove("BACKOFFICE_HISTORY")
        .env_remove("RUST_LOG");
    cmd
}

/// A command already pointed at `server` with a bearer token and a
/// profile name that has no keyring entry.
fn backend_cmd(home: &TempDir, server: &MockServer) -> assert_cmd::Command {
    let mut cmd = backoffice_cmd(home);
    cmd.args(["--profile", "cli-test", "--base-url", &server.uri(), "--token", "tok-1"]);
    cmd
}

fn ok(data: serde_json::Value) -> serde_json::Value {
    json!({ "code": 2000, "message": "ok", "data": data })
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = backoffice_cmd(&home).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_resources() {
    let home = TempDir::new().unwrap();
    backoffice_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("users")
            .and(predicate::str::contains("menus"))
            .and(predicate::str::contains("login")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    backoffice_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("backoffice"));
}

#[test]
fn test_completions_zsh() {
    let home = TempDir::new().unwrap();
    backoffice_cmd(&home)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_config_path_lives_under_home() {
    let home = TempDir::new().unwrap();
    backoffice_cmd(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_users_list_without_config() {
    let home = TempDir::new().unwrap();
    backoffice_cmd(&home)
        .args(["users", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No backend configured"));
}

#[test]
fn test_missing_token_exits_with_auth_code() {
    let home = TempDir::new().unwrap();
    backoffice_cmd(&home)
        .args(["--profile", "cli-test", "--base-url", "http://127.0.0.1:9", "users", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No token configured"));
}

#[test]
fn test_unknown_history_mode_in_env_is_rejected() {
    let home = TempDir::new().unwrap();
    backoffice_cmd(&home)
        .env("BACKOFFICE_DEFAULTS__HISTORY", "memory")
        .args(["config", "show"])
        .assert()
        .failure();
}

// ── Against a backend ───────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_users_list_renders_table_and_footer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .and(header("authorization", "Bearer tok-1"))
        .and(query_param("page", "2"))
        .and(query_param("size", "5"))
        .and(query_param("nickname", "ali"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 2000,
            "message": "ok",
            "data": [
                { "id": 6, "username": "alice", "nickname": "ali", "roleIds": [1] },
                { "id": 7, "username": "alina", "nickname": "ali", "roleIds": [] }
            ],
            "total": 7
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    backend_cmd(&home, &server)
        .args(["users", "list", "--page", "2", "--size", "5", "-f", "nickname=ali"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice").and(predicate::str::contains("alina")))
        .stderr(predicate::str::contains("page 2/2, 7 total"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_backend_error_surfaces_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/roles"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "code": 5000, "message": "db offline" })),
        )
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    backend_cmd(&home, &server)
        .args(["roles", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("db offline"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_with_missing_required_field_never_posts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(1))))
        .expect(0)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    backend_cmd(&home, &server)
        .args(["users", "create", "--set", "username=alice"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Password is required"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_posts_form_model_and_prints_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/users"))
        .and(body_json(json!({
            "username": "alice",
            "password": "secret-pw",
            "nickname": "Alice",
            "roleIds": [1, 2]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!(42))))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    backend_cmd(&home, &server)
        .args([
            "-o", "plain", "users", "create",
            "--set", "username=alice",
            "--set", "password=secret-pw",
            "--set", "nickname=Alice",
            "--set", "roleIds=[1,2]",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("42"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_merges_existing_row_with_changes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/posts/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "id": 3,
            "title": "Old",
            "description": "keep me",
            "content": "body"
        }))))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/posts/3"))
        .and(body_json(json!({ "title": "New", "description": "keep me", "content": "body" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 2000, "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    backend_cmd(&home, &server)
        .args(["posts", "update", "3", "--set", "title=New"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Updated post 3"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_requires_yes_without_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/categories/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 2000, "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    backend_cmd(&home, &server)
        .args(["categories", "delete", "5"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires confirmation"));

    backend_cmd(&home, &server)
        .args(["-y", "categories", "delete", "5"])
        .assert()
        .success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_prints_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({ "username": "admin", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "id": 1,
            "token": "fresh-token",
            "username": "admin",
            "nickname": "Admin",
            "description": "",
            "avatar": "",
            "email": ""
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    backoffice_cmd(&home)
        .env("BACKOFFICE_PASSWORD", "pw")
        .args(["--profile", "cli-test", "--base-url", &server.uri()])
        .args(["login", "--username", "admin", "--print-token"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fresh-token"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_menu_tree_links_follow_history_mode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/menus"))
        .and(query_param("tree", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 2000,
            "message": "ok",
            "data": [{
                "id": 1, "name": "System", "code": "system", "path": "/system",
                "icon": "", "type": 0, "parentId": 0,
                "children": [{
                    "id": 2, "name": "Users", "code": "users", "path": "/system/users",
                    "icon": "", "type": 1, "parentId": 1
                }]
            }],
            "total": 2
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let links = format!("  Users (users) -> {}/#/system/users", server.uri());
    backend_cmd(&home, &server)
        .env("BACKOFFICE_DEFAULTS__HISTORY", "hash")
        .args(["menus", "tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains(links));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_menus_tree_history_env_overrides_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/menus"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 2000,
            "message": "ok",
            "data": [{
                "id": 1, "name": "Posts", "code": "posts", "path": "/posts",
                "icon": "", "type": 1, "parentId": 0
            }],
            "total": 1
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    backend_cmd(&home, &server)
        .env("BACKOFFICE_DEFAULTS__HISTORY", "web")
        .env("BACKOFFICE_HISTORY", "hash")
        .args(["menus", "tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Posts (posts) -> {}/#/posts", server.uri())));

    backend_cmd(&home, &server)
        .env("BACKOFFICE_HISTORY", "memory")
        .args(["menus", "tree"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown history mode"));
}
