use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn tabwind_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tabwind");
    path
}

fn setup_test_env(config: &str) -> (TempDir, PathBuf, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let tabs_path = root.join("tabs.json");
    fs::write(
        &tabs_path,
        r#"[
  {"id": 1, "windowId": 10, "title": "GitHub", "url": "https://github.com"},
  {"id": 2, "windowId": 10, "title": "Gmail", "url": "https://mail.google.com"},
  {"id": 3, "windowId": 20, "title": "GitLab", "url": "https://gitlab.com"}
]"#,
    )
    .unwrap();

    let config_path = root.join("tabwind.toml");
    fs::write(&config_path, config).unwrap();

    (tmp, config_path, tabs_path)
}

fn run_tabwind(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = tabwind_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run tabwind binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

const DISABLED: &str = "[embedding]\nprovider = \"disabled\"\n";

#[test]
fn test_probe_disabled() {
    let (_tmp, config_path, _) = setup_test_env(DISABLED);

    let (stdout, stderr, success) = run_tabwind(&config_path, &["probe"]);
    assert!(success, "probe failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("disabled"));
    assert!(stdout.contains("false"));
}

#[test]
fn test_probe_embed_requires_backend() {
    let (_tmp, config_path, _) = setup_test_env(DISABLED);

    let (_, stderr, success) = run_tabwind(&config_path, &["probe", "--embed", "hello"]);
    assert!(!success);
    assert!(stderr.contains("not available"));
}

#[test]
fn test_search_substring_text() {
    let (_tmp, config_path, tabs_path) = setup_test_env(DISABLED);

    let (stdout, stderr, success) = run_tabwind(
        &config_path,
        &["search", "git", "--tabs", tabs_path.to_str().unwrap()],
    );
    assert!(success, "search failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("2 result(s) (substring)"));
    assert!(stdout.contains("1. GitHub"));
    assert!(stdout.contains("2. GitLab"));
    assert!(!stdout.contains("Gmail"));
}

#[test]
fn test_search_json_output() {
    let (_tmp, config_path, tabs_path) = setup_test_env(DISABLED);

    let (stdout, stderr, success) = run_tabwind(
        &config_path,
        &["search", "GIT", "--tabs", tabs_path.to_str().unwrap(), "--json"],
    );
    assert!(success, "search failed: stdout={}, stderr={}", stdout, stderr);

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["strategy"], "substring");
    let ids: Vec<i64> = json["hits"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn test_search_empty_query_lists_all_with_limit() {
    let (_tmp, config_path, tabs_path) = setup_test_env(DISABLED);

    let (stdout, _, success) = run_tabwind(
        &config_path,
        &["search", "", "--tabs", tabs_path.to_str().unwrap(), "--limit", "2"],
    );
    assert!(success);
    assert!(stdout.contains("2 result(s)"));
    assert!(stdout.contains("GitHub"));
    assert!(stdout.contains("Gmail"));
    assert!(!stdout.contains("GitLab"));
}

#[test]
fn test_search_no_match() {
    let (_tmp, config_path, tabs_path) = setup_test_env(DISABLED);

    let (stdout, _, success) = run_tabwind(
        &config_path,
        &["search", "zzz", "--tabs", tabs_path.to_str().unwrap()],
    );
    assert!(success);
    assert!(stdout.contains("No matching tabs found"));
}

#[test]
fn test_semantic_mode_without_backend_is_empty() {
    let (_tmp, config_path, tabs_path) = setup_test_env(DISABLED);

    let (stdout, _, success) = run_tabwind(
        &config_path,
        &[
            "search",
            "git",
            "--tabs",
            tabs_path.to_str().unwrap(),
            "--mode",
            "semantic",
        ],
    );
    assert!(success);
    assert!(stdout.contains("No matching tabs found"));
}

#[test]
fn test_search_rejects_unknown_mode() {
    let (_tmp, config_path, tabs_path) = setup_test_env(DISABLED);

    let (_, stderr, success) = run_tabwind(
        &config_path,
        &[
            "search",
            "git",
            "--tabs",
            tabs_path.to_str().unwrap(),
            "--mode",
            "fuzzy",
        ],
    );
    assert!(!success);
    assert!(stderr.contains("Unknown search mode"));
}

#[test]
fn test_search_toggle_modal_file() {
    let (tmp, config_path, _) = setup_test_env(DISABLED);
    let message_path = tmp.path().join("message.json");
    fs::write(
        &message_path,
        r#"{"action": "toggle-modal", "tabs": [{"id": 5, "title": "Rust docs", "url": "https://doc.rust-lang.org"}]}"#,
    )
    .unwrap();

    let (stdout, stderr, success) = run_tabwind(
        &config_path,
        &["search", "rust", "--tabs", message_path.to_str().unwrap()],
    );
    assert!(success, "search failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Rust docs"));
    assert!(stdout.contains("id: 5"));
}

#[test]
fn test_missing_tabs_file() {
    let (tmp, config_path, _) = setup_test_env(DISABLED);
    let missing = tmp.path().join("nope.json");

    let (_, stderr, success) = run_tabwind(
        &config_path,
        &["search", "git", "--tabs", missing.to_str().unwrap()],
    );
    assert!(!success);
    assert!(stderr.contains("Failed to read tabs file"));
}

#[test]
fn test_select_first_match() {
    let (_tmp, config_path, tabs_path) = setup_test_env(DISABLED);

    let (stdout, stderr, success) = run_tabwind(
        &config_path,
        &["select", "git", "--tabs", tabs_path.to_str().unwrap()],
    );
    assert!(success, "select failed: stdout={}, stderr={}", stdout, stderr);
    let json: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"action": "switch-tab", "tabId": 1, "windowId": 10})
    );
}

#[test]
fn test_select_arrow_keys_wrap() {
    let (_tmp, config_path, tabs_path) = setup_test_env(DISABLED);

    // Two matches: down once lands on GitLab, down twice wraps to GitHub.
    let (stdout, _, success) = run_tabwind(
        &config_path,
        &["select", "git", "--tabs", tabs_path.to_str().unwrap(), "--down", "1"],
    );
    assert!(success);
    assert!(stdout.contains("\"tabId\":3"));
    assert!(stdout.contains("\"windowId\":20"));

    let (stdout, _, success) = run_tabwind(
        &config_path,
        &["select", "git", "--tabs", tabs_path.to_str().unwrap(), "--down", "2"],
    );
    assert!(success);
    assert!(stdout.contains("\"tabId\":1"));

    let (stdout, _, success) = run_tabwind(
        &config_path,
        &["select", "", "--tabs", tabs_path.to_str().unwrap(), "--up", "1"],
    );
    assert!(success);
    assert!(stdout.contains("\"tabId\":3"));
}

#[test]
fn test_select_no_match() {
    let (_tmp, config_path, tabs_path) = setup_test_env(DISABLED);

    let (stdout, _, success) = run_tabwind(
        &config_path,
        &["select", "zzz", "--tabs", tabs_path.to_str().unwrap()],
    );
    assert!(success);
    assert!(stdout.contains("No matching tabs found"));
}

#[test]
fn test_invalid_config_rejected() {
    let (_tmp, config_path, tabs_path) =
        setup_test_env("[ranking]\nmax_results = 0\n");

    let (_, stderr, success) = run_tabwind(
        &config_path,
        &["search", "git", "--tabs", tabs_path.to_str().unwrap()],
    );
    assert!(!success);
    assert!(stderr.contains("ranking.max_results"));
}

#[test]
fn test_config_max_results_applies() {
    let (_tmp, config_path, tabs_path) = setup_test_env("[ranking]\nmax_results = 1\n");

    let (stdout, _, success) = run_tabwind(
        &config_path,
        &["search", "git", "--tabs", tabs_path.to_str().unwrap(), "--json"],
    );
    assert!(success);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["hits"].as_array().unwrap().len(), 1);
}

#[test]
fn test_runs_without_config_file() {
    let (_tmp, _, tabs_path) = setup_test_env(DISABLED);
    let output = Command::new(tabwind_binary())
        .args(["search", "mail", "--tabs", tabs_path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Gmail"));
}
