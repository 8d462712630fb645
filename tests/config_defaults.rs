// tests/config_defaults.rs
use keyword_news_monitor::config::{MonitorConfig, ENV_CONFIG_PATH};
use std::{env, fs};

#[test]
fn full_file_parses() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("monitor.toml");
    fs::write(
        &path,
        r#"
keywords = ["fed rates", "금리"]
duplicate_threshold = 0.7
check_interval_minutes = 5
notifications_enabled = false
sound_enabled = true
language = "ko"
"#,
    )
    .unwrap();

    let cfg = MonitorConfig::load_from(&path).unwrap();
    assert_eq!(cfg.keywords.len(), 2);
    assert_eq!(cfg.duplicate_threshold, 0.7);
    assert_eq!(cfg.check_interval_minutes, 5);
    assert!(!cfg.notifications_enabled);
    assert!(cfg.sound_enabled);
    assert_eq!(cfg.language.as_deref(), Some("ko"));
}

#[serial_test::serial]
#[test]
fn env_path_takes_precedence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("monitor.toml");
    fs::write(&path, r#"keywords = ["from-env"]"#).unwrap();

    env::set_var(ENV_CONFIG_PATH, path.display().to_string());
    let cfg = MonitorConfig::load_default();
    env::remove_var(ENV_CONFIG_PATH);

    assert_eq!(cfg.keywords, vec!["from-env".to_string()]);
}

#[serial_test::serial]
#[test]
fn unreadable_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "keywords = not-a-list").unwrap();

    env::set_var(ENV_CONFIG_PATH, path.display().to_string());
    let cfg = MonitorConfig::load_default();
    env::remove_var(ENV_CONFIG_PATH);

    assert_eq!(cfg, MonitorConfig::default());
}

#[serial_test::serial]
#[test]
fn missing_config_falls_back_to_defaults() {
    env::set_var(ENV_CONFIG_PATH, "/definitely/not/here.toml");
    let cfg = MonitorConfig::load_default();
    env::remove_var(ENV_CONFIG_PATH);

    assert_eq!(cfg, MonitorConfig::default());
    assert_eq!(cfg.duplicate_threshold, 0.8);
    assert_eq!(cfg.check_interval_minutes, 10);
}
