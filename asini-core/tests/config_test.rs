use std::fs;

use tempfile::TempDir;

use asini_core::config::{ToolsConfig, CONFIG_FILE_NAME};
use asini_core::Error;

#[test]
fn test_defaults() {
    let config = ToolsConfig::default();
    assert_eq!(config.git, "git");
    assert_eq!(config.npm, "npm");
    assert_eq!(config.npm_client, "npm");
    assert_eq!(config.remote, "origin");
    assert_eq!(config.registry, None);
    assert_eq!(config.backup_prefix, "asini");
}

#[test]
fn test_parse_partial_tools_table() {
    let config = ToolsConfig::from_toml_str(
        r#"
[tools]
npm_client = "yarn"
registry = "https://registry.example.com"
"#,
    )
    .unwrap();

    assert_eq!(config.npm_client, "yarn");
    assert_eq!(
        config.registry.as_deref(),
        Some("https://registry.example.com")
    );
    assert_eq!(config.remote, "origin");
}

#[test]
fn test_missing_tools_table_yields_defaults() {
    let config = ToolsConfig::from_toml_str("[other]\nkey = 1\n").unwrap();
    assert_eq!(config, ToolsConfig::default());
}

#[test]
fn test_malformed_config_is_toml_error() {
    let err = ToolsConfig::from_toml_str("[tools\nremote = ").unwrap_err();
    assert!(matches!(err, Error::Toml { .. }));
}

#[test]
fn test_discover_walks_up_to_config() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(
        root.join(CONFIG_FILE_NAME),
        "[tools]\nremote = \"upstream\"\n",
    )
    .unwrap();
    let nested = root.join("packages").join("foo");
    fs::create_dir_all(&nested).unwrap();

    let config = ToolsConfig::discover(&nested).unwrap();
    assert_eq!(config.remote, "upstream");
}

#[test]
fn test_discover_stops_at_repository_root() {
    let temp_dir = TempDir::new().unwrap();
    let outer = temp_dir.path();
    fs::write(
        outer.join(CONFIG_FILE_NAME),
        "[tools]\nremote = \"upstream\"\n",
    )
    .unwrap();
    let repo = outer.join("repo");
    fs::create_dir_all(repo.join(".git")).unwrap();
    let nested = repo.join("packages");
    fs::create_dir_all(&nested).unwrap();

    assert_eq!(ToolsConfig::find_config_file(&nested), None);
    assert_eq!(ToolsConfig::discover(&nested).unwrap().remote, "origin");
}

#[test]
fn test_cli_overrides() {
    let config = ToolsConfig::default()
        .with_registry(Some("https://r.example".to_string()))
        .with_npm_client(Some("pnpm".to_string()))
        .with_registry(None)
        .with_npm_client(None);

    assert_eq!(config.registry.as_deref(), Some("https://r.example"));
    assert_eq!(config.npm_client, "pnpm");
}
