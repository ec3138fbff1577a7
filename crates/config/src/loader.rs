use super::defaults::DEFAULT_CONFIG_TEMPLATE;
use super::migration::migrate_config_if_needed;
use super::models::Config;
use crate::ConfigError;
use bucket_events::EventBus;
use std::path::Path;
use std::sync::Arc;

impl Config {
    /// Loads configuration from a file, registering defaults for `scope`
    pub async fn from_file<P: AsRef<Path>>(path: P, scope: &str) -> Result<Self, ConfigError> {
        Self::from_file_with_events(path, scope, None).await
    }

    /// Loads configuration from a file with optional event bus for notifications
    pub async fn from_file_with_events<P: AsRef<Path>>(
        path: P,
        scope: &str,
        events: Option<&Arc<EventBus>>,
    ) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        // Create default config if it doesn't exist
        if !path.exists() {
            create_default_config(path).await?;
        }

        migrate_config_if_needed(path, scope, events).await?;

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        config.connector(scope).validate()?;

        Ok(config)
    }
}

async fn create_default_config<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
    tokio::fs::write(path, DEFAULT_CONFIG_TEMPLATE).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BackendKind;

    #[tokio::test]
    async fn test_missing_file_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::from_file(&path, "connector").await.unwrap();

        assert!(path.exists());
        let settings = config.connector("connector");
        assert_eq!(settings.bucket_name, "example.com");
        assert_eq!(settings.json_key, "gcp.json");
        assert_eq!(settings.backend, BackendKind::Gcs);
        assert_eq!(config.server.port, 8080);
    }

    #[tokio::test]
    async fn test_scope_defaults_are_written_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "[media]\nbucket_name = \"media.example.org\"\n")
            .await
            .unwrap();

        let config = Config::from_file(&path, "media").await.unwrap();
        assert_eq!(config.connector("media").bucket_name, "media.example.org");

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.contains("json_key = \"gcp.json\""));
        assert!(written.contains("bucket_name = \"media.example.org\""));
        assert!(written.contains("[server]"));
    }

    #[tokio::test]
    async fn test_invalid_scope_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "[connector]\nbucket_name = \"\"\n")
            .await
            .unwrap();

        let result = Config::from_file(&path, "connector").await;
        assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
    }
}
