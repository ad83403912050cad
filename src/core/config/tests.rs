use chrono::{Duration, Utc};
use tempfile::TempDir;

use crate::core::config::{Config, ConfigError};
use crate::core::message::Message;

fn temp_config_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join(".explain.json")
}

#[test]
fn save_and_load_round_trip_preserves_conversation_and_model() {
    let dir = TempDir::new().unwrap();
    let path = temp_config_path(&dir);

    let mut config = Config::default();
    config.openai_api_key = "sk-test".to_string();
    config.model = "gpt-4-turbo-preview".to_string();
    config.conversation = vec![
        Message::system("be concise"),
        Message::user("hi"),
        Message::assistant("Hello"),
    ];

    config.save_to_path(&path).unwrap();
    let loaded = Config::load_from_path(&path).unwrap();

    assert_eq!(loaded.conversation, config.conversation);
    assert_eq!(loaded.model, config.model);
    assert_eq!(loaded.openai_api_key, config.openai_api_key);
}

#[test]
fn missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_path(&temp_config_path(&dir)).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn malformed_json_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = temp_config_path(&dir);
    std::fs::write(&path, "{not json").unwrap();

    let err = Config::load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn wrong_shape_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = temp_config_path(&dir);
    std::fs::write(&path, r#"{"openai_api_key": 42}"#).unwrap();

    let err = Config::load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn zero_timestamp_is_normalized_to_now_on_load() {
    let dir = TempDir::new().unwrap();
    let path = temp_config_path(&dir);
    std::fs::write(
        &path,
        r#"{"openai_api_key":"k","model":"gpt-4","conversation":[]}"#,
    )
    .unwrap();

    let before = Utc::now() - Duration::seconds(5);
    let loaded = Config::load_from_path(&path).unwrap();
    assert!(loaded.updated_at > before);
    assert!(!loaded.has_zero_timestamp());
}

#[test]
fn persisted_file_uses_the_documented_field_names() {
    let dir = TempDir::new().unwrap();
    let path = temp_config_path(&dir);

    let mut config = Config::default();
    config.conversation.push(Message::system("be concise"));
    config.save_to_path(&path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(value.get("openai_api_key").is_some());
    assert!(value.get("model").is_some());
    assert!(value.get("updated_at").is_some());
    assert_eq!(value["conversation"][0]["role"], "system");
}

#[cfg(unix)]
#[test]
fn saved_file_is_owner_readable_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = temp_config_path(&dir);
    Config::default().save_to_path(&path).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn save_replaces_previous_content_entirely() {
    // Two processes racing on the same file are unguarded by design: the
    // last writer wins. This pins down the full-document-overwrite half of
    // that contract.
    let dir = TempDir::new().unwrap();
    let path = temp_config_path(&dir);

    let mut first = Config::default();
    first.conversation = vec![Message::system("one"), Message::user("two")];
    first.save_to_path(&path).unwrap();

    let mut second = Config::default();
    second.model = "gpt-3.5-turbo".to_string();
    second.save_to_path(&path).unwrap();

    let loaded = Config::load_from_path(&path).unwrap();
    assert!(loaded.conversation.is_empty());
    assert_eq!(loaded.model, "gpt-3.5-turbo");
}
