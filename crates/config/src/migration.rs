use crate::ConfigError;
use bucket_events::{AppEvent, EventBus};
use std::path::Path;
use std::sync::Arc;
use toml_edit::{Array, DocumentMut, Item, Table, Value};

/// Migrates config file to latest format if needed, registering default
/// values for the given connector scope.
pub async fn migrate_config_if_needed<P: AsRef<Path>>(
    path: P,
    scope: &str,
    events: Option<&Arc<EventBus>>,
) -> Result<(), ConfigError> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    let mut doc = content.parse::<DocumentMut>()?;
    let mut added_fields = Vec::new();

    migrate_server_section(&mut doc, &mut added_fields)?;
    migrate_scope_section(&mut doc, scope, &mut added_fields)?;

    // Only write if we added fields
    if !added_fields.is_empty() {
        tokio::fs::write(path.as_ref(), doc.to_string()).await?;
        tracing::debug!("Config migrated: {}", added_fields.join(", "));

        if let Some(event_bus) = events {
            event_bus.emit(AppEvent::ConfigMigrated {
                added_fields: added_fields.clone(),
            });
        }
    }

    Ok(())
}

fn migrate_server_section(
    doc: &mut DocumentMut,
    added_fields: &mut Vec<String>,
) -> Result<(), ConfigError> {
    ensure_table(doc, "server", added_fields);

    let server = doc["server"]
        .as_table_mut()
        .ok_or_else(|| ConfigError::MigrationError("Invalid [server] section in config".to_string()))?;
    ensure_field(server, "server", "host", Value::from("0.0.0.0"), added_fields);
    ensure_field(server, "server", "port", Value::from(8080), added_fields);
    ensure_field(server, "server", "timeout_secs", Value::from(60), added_fields);
    ensure_field(server, "server", "max_body_size_mb", Value::from(32), added_fields);
    ensure_field(server, "server", "max_concurrent_requests", Value::from(1000), added_fields);

    if !server.contains_key("allowed_origins") {
        let mut arr = Array::new();
        arr.push("*");
        server["allowed_origins"] = Item::Value(Value::Array(arr));
        added_fields.push("server.allowed_origins".to_string());
    }

    Ok(())
}

fn migrate_scope_section(
    doc: &mut DocumentMut,
    scope: &str,
    added_fields: &mut Vec<String>,
) -> Result<(), ConfigError> {
    if scope == "server" {
        return Err(ConfigError::InvalidConfig(
            "\"server\" is reserved and cannot be used as a connector scope".to_string(),
        ));
    }

    ensure_table(doc, scope, added_fields);

    let table = doc[scope]
        .as_table_mut()
        .ok_or_else(|| ConfigError::MigrationError(format!("Invalid [{}] section in config", scope)))?;
    ensure_field(table, scope, "backend", Value::from("gcs"), added_fields);
    ensure_field(table, scope, "bucket_name", Value::from(super::DEFAULT_BUCKET_NAME), added_fields);
    ensure_field(table, scope, "json_key", Value::from(super::DEFAULT_JSON_KEY), added_fields);
    ensure_field(table, scope, "timeout_secs", Value::from(60), added_fields);

    Ok(())
}

fn ensure_table(doc: &mut DocumentMut, name: &str, added_fields: &mut Vec<String>) {
    if !doc.contains_key(name) {
        doc[name] = Item::Table(Table::new());
        added_fields.push(name.to_string());
    }
}

fn ensure_field(
    table: &mut Table,
    section: &str,
    key: &str,
    default_value: Value,
    added_fields: &mut Vec<String>,
) {
    if !table.contains_key(key) {
        table[key] = Item::Value(default_value);
        added_fields.push(format!("{}.{}", section, key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_complete_file_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, super::super::defaults::DEFAULT_CONFIG_TEMPLATE)
            .await
            .unwrap();

        migrate_config_if_needed(&path, "connector", None).await.unwrap();

        let after = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(after, super::super::defaults::DEFAULT_CONFIG_TEMPLATE);
    }

    #[tokio::test]
    async fn test_partial_server_section_is_completed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "[server]\nport = 9000\n").await.unwrap();

        migrate_config_if_needed(&path, "connector", None).await.unwrap();

        let doc = tokio::fs::read_to_string(&path)
            .await
            .unwrap()
            .parse::<DocumentMut>()
            .unwrap();
        assert_eq!(doc["server"]["port"].as_integer(), Some(9000));
        assert_eq!(doc["server"]["max_concurrent_requests"].as_integer(), Some(1000));
        assert_eq!(doc["server"]["max_body_size_mb"].as_integer(), Some(32));
        assert_eq!(doc["connector"]["bucket_name"].as_str(), Some("example.com"));
    }

    #[tokio::test]
    async fn test_server_scope_name_is_reserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "").await.unwrap();

        let result = migrate_config_if_needed(&path, "server", None).await;
        assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
    }
}
