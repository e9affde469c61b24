//! Configuration file support for artisync.
//!
//! Loads connection settings from `~/.artisync/config.toml` with the
//! following precedence: CLI arguments > Environment variables > Config file
//!
//! ## Configuration File Format
//!
//! ```toml
//! # ~/.artisync/config.toml
//!
//! [artifactory]
//! base_url = "https://artifactory.example.com"
//! auth_type = "AccessToken"
//! auth_string = "your-access-token"
//! ignore_ca_error = false
//! timeout_ms = 30000
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration structure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub artifactory: ArtifactoryConfig,
}

/// Connection defaults for the Artifactory server.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactoryConfig {
    pub base_url: Option<String>,
    pub auth_type: Option<String>,
    pub auth_string: Option<String>,
    pub ignore_ca_error: Option<bool>,
    pub timeout_ms: Option<u64>,
}

/// Returns the path to the config file (~/.artisync/config.toml).
fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".artisync").join("config.toml"))
}

/// Loads the configuration file at `path` if it exists.
///
/// Returns `Ok(None)` if the file doesn't exist and `Err` if it exists
/// but fails to parse.
pub fn load_config_from(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;

    tracing::debug!(
        target: "artisync::config",
        path = %path.display(),
        "Loaded configuration file"
    );

    Ok(Some(config))
}

/// Loads `~/.artisync/config.toml` if present.
pub fn load_config() -> Result<Option<Config>> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(None),
    }
}

/// Applies configuration file settings to environment variables.
///
/// Only sets variables that are not already set, so clap's `env` fallback
/// sees CLI > ENV > config file. Call before parsing CLI arguments.
pub fn apply_config_to_env() -> Result<()> {
    if let Some(config) = load_config()? {
        apply_artifactory_config_to_env(&config.artifactory);
    }
    Ok(())
}

fn apply_artifactory_config_to_env(artifactory: &ArtifactoryConfig) {
    fn set_if_absent(key: &str, value: &str) {
        if std::env::var(key).is_err() {
            std::env::set_var(key, value);
            tracing::trace!(
                target: "artisync::config",
                key,
                "Set environment variable from config file"
            );
        }
    }

    if let Some(ref url) = artifactory.base_url {
        set_if_absent("ARTISYNC_BASE_URL", url);
    }

    if let Some(ref auth_type) = artifactory.auth_type {
        set_if_absent("ARTISYNC_AUTH_TYPE", auth_type);
    }

    if let Some(ref auth_string) = artifactory.auth_string {
        set_if_absent("ARTISYNC_AUTH_STRING", auth_string);
    }

    if let Some(ignore) = artifactory.ignore_ca_error {
        set_if_absent(
            "ARTISYNC_IGNORE_CA_ERROR",
            if ignore { "true" } else { "false" },
        );
    }

    if let Some(timeout) = artifactory.timeout_ms {
        set_if_absent("ARTISYNC_TIMEOUT_MS", &timeout.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artisync_test_utils::{env_guard, set_env_var, TestFixture};

    #[test]
    fn config_path_returns_expected_location() {
        let path = config_path().unwrap();
        assert!(path.ends_with(".artisync/config.toml"));
    }

    #[test]
    fn parse_full_artifactory_config() {
        let toml = r#"
            [artifactory]
            base_url = "https://art.example.com"
            auth_type = "ApiKey"
            auth_string = "key"
            ignore_ca_error = true
            timeout_ms = 1000
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        let art = config.artifactory;
        assert_eq!(art.base_url.as_deref(), Some("https://art.example.com"));
        assert_eq!(art.auth_type.as_deref(), Some("ApiKey"));
        assert_eq!(art.auth_string.as_deref(), Some("key"));
        assert_eq!(art.ignore_ca_error, Some(true));
        assert_eq!(art.timeout_ms, Some(1000));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: std::result::Result<Config, _> =
            toml::from_str("[artifactory]\nbase_uri = \"typo\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_returns_none() {
        let fixture = TestFixture::new().unwrap();
        let path = fixture.home_path().join("absent.toml");
        assert!(load_config_from(&path).unwrap().is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let fixture = TestFixture::new().unwrap();
        let path = fixture.write_file("config.toml", "[artifactory\n").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn apply_config_respects_existing_env_vars() {
        let _g = env_guard();
        let _url = set_env_var("ARTISYNC_BASE_URL", Some("https://from-env.example.com"));
        let _timeout = set_env_var("ARTISYNC_TIMEOUT_MS", None);

        apply_artifactory_config_to_env(&ArtifactoryConfig {
            base_url: Some("https://from-file.example.com".to_string()),
            timeout_ms: Some(1500),
            ..Default::default()
        });

        assert_eq!(
            std::env::var("ARTISYNC_BASE_URL").unwrap(),
            "https://from-env.example.com",
            "Config should not override existing env var"
        );
        assert_eq!(std::env::var("ARTISYNC_TIMEOUT_MS").unwrap(), "1500");
    }

    #[test]
    fn apply_config_reads_home_directory() {
        let _g = env_guard();
        let fixture = TestFixture::new().unwrap();
        let _home = fixture.home_guard();
        let _auth = set_env_var("ARTISYNC_AUTH_TYPE", None);
        fixture
            .write_file(".artisync/config.toml", "[artifactory]\nauth_type = \"ApiKey\"\n")
            .unwrap();

        apply_config_to_env().unwrap();

        assert_eq!(std::env::var("ARTISYNC_AUTH_TYPE").unwrap(), "ApiKey");
    }
}
