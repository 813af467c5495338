use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

use prwatch::util::config::AppConfig;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

#[test]
fn test_load_full_config() {
    let toml = r#"
mode = "production"

[github]
owner = "acme"
repo = "widgets"
login = "alice"
token = "ghp_secret"
api_url = "https://ghe.example.com/api/v3"
timeout_secs = 5

[server]
host = "127.0.0.1"
port = 8080

[dashboard]
refresh_secs = 30
"#;
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(toml.as_bytes()).unwrap();

    let config = AppConfig::load(Some(f.path())).unwrap();
    assert_eq!(config.mode, "production");
    assert_eq!(config.github.owner, "acme");
    assert_eq!(config.github.repo, "widgets");
    assert_eq!(config.github.login, "alice");
    assert_eq!(config.github.token.as_deref(), Some("ghp_secret"));
    assert_eq!(config.github.api_url, "https://ghe.example.com/api/v3");
    assert_eq!(config.github.timeout_secs, 5);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.dashboard.refresh_secs, 30);
    assert_eq!(config.github.repo_ref().full_name(), "acme/widgets");
}

#[test]
fn test_load_partial_config_uses_defaults() {
    let toml = r#"
[github]
owner = "acme"
"#;
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(toml.as_bytes()).unwrap();

    let config = AppConfig::load(Some(f.path())).unwrap();
    assert_eq!(config.github.owner, "acme");
    assert!(config.github.repo.is_empty());
    assert!(config.github.token.is_none());
    assert_eq!(config.github.api_url, "https://api.github.com");
    assert_eq!(config.github.timeout_secs, 30);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 3099);
    assert_eq!(config.dashboard.refresh_secs, 10);
    assert_eq!(config.mode, "development");
}

#[test]
fn test_load_nonexistent_file_fails() {
    let result = AppConfig::load(Some(std::path::Path::new("/nonexistent/path/config.toml")));
    assert!(result.is_err());
}

#[test]
fn test_load_invalid_toml_fails() {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(b"this is not [valid toml {{").unwrap();

    let result = AppConfig::load(Some(f.path()));
    assert!(result.is_err());
}

#[test]
fn test_env_overrides_file_values() {
    let mut config = AppConfig::default();
    config.github.owner = "from-file".into();

    config
        .apply_env(env_from(&[
            ("OWNER", "acme"),
            ("REPO", "widgets"),
            ("LOGIN", "alice"),
            ("PORT", "4000"),
            ("NODE_ENV", "production"),
        ]))
        .unwrap();

    assert_eq!(config.github.owner, "acme");
    assert_eq!(config.github.repo, "widgets");
    assert_eq!(config.github.login, "alice");
    assert_eq!(config.server.port, 4000);
    assert_eq!(config.mode, "production");
}

#[test]
fn test_app_env_preferred_over_node_env() {
    let mut config = AppConfig::default();
    config
        .apply_env(env_from(&[("APP_ENV", "staging"), ("NODE_ENV", "production")]))
        .unwrap();
    assert_eq!(config.mode, "staging");
}

#[test]
fn test_blank_env_values_are_ignored() {
    let mut config = AppConfig::default();
    config.github.login = "alice".into();
    config.apply_env(env_from(&[("LOGIN", "  ")])).unwrap();
    assert_eq!(config.github.login, "alice");
}

#[test]
fn test_invalid_port_env_fails() {
    let mut config = AppConfig::default();
    let result = config.apply_env(env_from(&[("PORT", "not-a-port")]));
    assert!(result.is_err());
}

#[test]
fn test_validate_reports_all_missing_fields() {
    let config = AppConfig::default();
    let err = config.validate().unwrap_err().to_string();
    assert!(err.contains("github.owner"));
    assert!(err.contains("github.repo"));
    assert!(err.contains("github.login"));
}

#[test]
fn test_validate_complete_config() {
    let mut config = AppConfig::default();
    config
        .apply_env(env_from(&[
            ("OWNER", "acme"),
            ("REPO", "widgets"),
            ("LOGIN", "alice"),
        ]))
        .unwrap();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_insecure_api_url() {
    let mut config = AppConfig::default();
    config.github.owner = "acme".into();
    config.github.repo = "widgets".into();
    config.github.login = "alice".into();
    config.github.api_url = "http://api.github.com".into();
    assert!(config.validate().is_err());

    config.github.api_url = "http://127.0.0.1:9999".into();
    assert!(config.validate().is_ok());
}
