#![allow(clippy::unwrap_used)]
//! CLI smoke tests to verify basic command functionality.
//!
//! Every test points the binary at its own database and config directory
//! so nothing touches the real user data.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CHAT_ID: &str = "chat_1700000000000_smoke1234";

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    #[allow(deprecated)]
    fn buddy(&self) -> Command {
        let mut cmd = Command::cargo_bin("buddy").unwrap();
        cmd.env("BUDDY_DB", self.dir.path().join("buddy.db"))
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env_remove("OPENROUTER_API_KEY")
            .env_remove("BUDDY_LOG")
            .env_remove("RUST_LOG");
        cmd
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Writes an exported chat and returns its path.
    fn write_export(&self) -> PathBuf {
        let json = format!(
            r#"{{
  "id": "{CHAT_ID}",
  "title": "Borrow checker question",
  "lastModified": "2023-11-14T22:13:20Z",
  "messages": [
    {{"id": 1700000000000, "content": "Why does the borrow checker complain?", "isUser": true,
      "timestamp": "2023-11-14T22:13:20Z", "model": "openai/gpt-4"}},
    {{"id": 1700000000001, "content": "Because of `&mut`:\n```rust\nlet a = &mut v;\n```", "isUser": false,
      "timestamp": "2023-11-14T22:13:20Z", "model": "openai/gpt-4"}}
  ],
  "model": "openai/gpt-4",
  "tokenCount": 12
}}"#
        );
        let path = self.path("import.json");
        fs::write(&path, json).unwrap();
        path
    }
}

#[test]
fn test_help_displays_usage() {
    TestEnv::new()
        .buddy()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("AI coding assistant chat"))
        .stdout(predicate::str::contains("--model"))
        .stdout(predicate::str::contains("--provider"))
        .stdout(predicate::str::contains("history"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn test_version_displays_version() {
    TestEnv::new()
        .buddy()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_chat_help() {
    TestEnv::new()
        .buddy()
        .args(["chat", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--new"))
        .stdout(predicate::str::contains("--resume"));
}

#[test]
fn test_models_list_shows_presets() {
    TestEnv::new()
        .buddy()
        .arg("models")
        .assert()
        .success()
        .stdout(predicate::str::contains("openai/gpt-3.5-turbo"))
        .stdout(predicate::str::contains("openai/gpt-4"))
        .stdout(predicate::str::contains("(current)"));
}

#[test]
fn test_models_add_use_remove() {
    let env = TestEnv::new();

    env.buddy()
        .args(["models", "add", "mistral/mixtral-8x7b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added custom model"));

    env.buddy()
        .args(["models", "use", "mistral/mixtral-8x7b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched to"));

    env.buddy()
        .arg("models")
        .assert()
        .success()
        .stdout(predicate::str::contains("Custom models"))
        .stdout(predicate::str::contains("mistral/mixtral-8x7b"));

    env.buddy()
        .args(["models", "remove", "mistral/mixtral-8x7b"])
        .assert()
        .success();
}

#[test]
fn test_models_add_invalid_id() {
    TestEnv::new()
        .buddy()
        .args(["models", "add", "no-slash"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("organization/model-name"));
}

#[test]
fn test_models_use_unknown() {
    TestEnv::new()
        .buddy()
        .args(["models", "use", "nobody/unknown"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown model"));
}

#[test]
fn test_history_empty() {
    TestEnv::new()
        .buddy()
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No chat history yet"));
}

#[test]
fn test_import_history_show_export_delete() {
    let env = TestEnv::new();
    let file = env.write_export();

    env.buddy()
        .arg("import")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Borrow checker question"));

    env.buddy()
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Borrow checker question"))
        .stdout(predicate::str::contains(CHAT_ID));

    env.buddy()
        .args(["show", CHAT_ID])
        .assert()
        .success()
        .stdout(predicate::str::contains("Why does the borrow checker complain?"))
        .stdout(predicate::str::contains("RUST"));

    let out_dir = env.path("exports");
    fs::create_dir_all(&out_dir).unwrap();
    env.buddy()
        .args(["export", CHAT_ID, "--format", "html", "--output"])
        .arg(&out_dir)
        .assert()
        .success();
    let html = fs::read_to_string(out_dir.join("buddyai-chat-Borrow checker question.html")).unwrap();
    assert!(html.contains("<code class=\"language-rust\">"));
    assert!(html.contains("&amp;mut"));

    let json_path = env.path("roundtrip.json");
    env.buddy()
        .args(["export", CHAT_ID, "--output"])
        .arg(&json_path)
        .assert()
        .success();
    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(exported["messages"].as_array().unwrap().len(), 2);
    assert_eq!(exported["messages"][1]["isUser"], false);

    env.buddy()
        .args(["delete", CHAT_ID, "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chat deleted"));

    env.buddy()
        .args(["show", CHAT_ID])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Chat not found"));
}

#[test]
fn test_import_rejects_invalid_file() {
    let env = TestEnv::new();
    let path = env.path("broken.json");
    fs::write(&path, "{ not json").unwrap();

    env.buddy()
        .arg("import")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid chat export"));
}

#[test]
fn test_clear_history() {
    let env = TestEnv::new();
    let file = env.write_export();
    env.buddy().arg("import").arg(&file).assert().success();

    env.buddy()
        .args(["clear-history", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 chats"));

    env.buddy()
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No chat history yet"));
}

#[test]
fn test_delete_unknown_chat() {
    TestEnv::new()
        .buddy()
        .args(["delete", "chat_missing", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Chat not found"));
}

#[test]
fn test_export_without_chats() {
    TestEnv::new()
        .buddy()
        .arg("export")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No chat has been opened yet"));
}

#[test]
fn test_providers_lists_builtin() {
    TestEnv::new()
        .buddy()
        .arg("providers")
        .assert()
        .success()
        .stdout(predicate::str::contains("openrouter"))
        .stdout(predicate::str::contains("https://openrouter.ai/api"));
}

#[test]
fn test_providers_unknown() {
    TestEnv::new()
        .buddy()
        .args(["providers", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_configure_show() {
    TestEnv::new()
        .buddy()
        .args(["configure", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current defaults"))
        .stdout(predicate::str::contains("openrouter"));
}
