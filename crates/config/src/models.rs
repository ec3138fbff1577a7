use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level configuration file.
///
/// Every table other than `[server]` is a connector scope, keyed by the
/// scope name handed to the connector at wiring time.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "super::defaults::server_settings")]
    pub server: ServerSettings,
    #[serde(flatten)]
    pub scopes: BTreeMap<String, ConnectorSettings>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "super::defaults::host")]
    pub host: String,
    #[serde(default = "super::defaults::port")]
    pub port: u16,
    #[serde(default = "super::defaults::timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "super::defaults::max_body_size")]
    pub max_body_size_mb: usize,
    #[serde(default = "super::defaults::max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    #[serde(default = "super::defaults::allowed_origins")]
    pub allowed_origins: Vec<String>,
}

/// Settings for one connector scope (`<scope>.bucket_name`, `<scope>.json_key`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConnectorSettings {
    #[serde(default = "super::defaults::backend")]
    pub backend: BackendKind,
    #[serde(default = "super::defaults::bucket_name")]
    pub bucket_name: String,
    #[serde(default = "super::defaults::json_key")]
    pub json_key: String,
    /// Per-operation deadline for remote calls, 0 = no deadline
    #[serde(default = "super::defaults::connector_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Gcs,
    Memory,
}

impl Config {
    /// Resolves the settings of a scope, falling back to defaults when the
    /// scope table is absent.
    pub fn connector(&self, scope: &str) -> ConnectorSettings {
        self.scopes.get(scope).cloned().unwrap_or_default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: super::defaults::server_settings(),
            scopes: BTreeMap::new(),
        }
    }
}

impl Default for ConnectorSettings {
    fn default() -> Self {
        super::defaults::connector_settings()
    }
}

impl ConnectorSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket_name.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "bucket_name must not be empty".to_string(),
            ));
        }
        if self.backend == BackendKind::Gcs && self.json_key.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "json_key must point to a service account file when backend = \"gcs\"".to_string(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Gcs => f.write_str("gcs"),
            BackendKind::Memory => f.write_str("memory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_defaults_for_missing_scope() {
        let config = Config::default();
        let settings = config.connector("uploads");

        assert_eq!(settings.bucket_name, "example.com");
        assert_eq!(settings.json_key, "gcp.json");
        assert_eq!(settings.backend, BackendKind::Gcs);
    }

    #[test]
    fn test_partial_scope_gets_defaults() {
        let config: Config = toml::from_str(
            r#"
            [avatars]
            bucket_name = "cdn.example.org"
            "#,
        )
        .unwrap();

        let settings = config.connector("avatars");
        assert_eq!(settings.bucket_name, "cdn.example.org");
        assert_eq!(settings.json_key, "gcp.json");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_validate_rejects_empty_bucket() {
        let settings = ConnectorSettings {
            bucket_name: " ".to_string(),
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::InvalidConfig(_))));

        let memory = ConnectorSettings {
            backend: BackendKind::Memory,
            json_key: String::new(),
            ..Default::default()
        };
        assert!(memory.validate().is_ok());
    }
}
