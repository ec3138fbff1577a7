use bucket_events::{AppEvent, EventBus};
use bucket_config::Config;
use bucket_storage::BucketConnector;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Builds the connector for `scope` and opens it; a failure here aborts startup
pub async fn open(config: &Config, scope: &str, events: &Arc<EventBus>) -> Result<Arc<BucketConnector>> {
    let settings = config.connector(scope);
    let backend = settings.backend.to_string();
    let connector = Arc::new(BucketConnector::new(scope, settings));

    if let Err(e) = connector.open().await {
        events.emit(AppEvent::Error {
            context: format!("Opening connector '{}'", scope),
            error: e.to_string(),
        });
        return Err(e).with_context(|| format!("failed to open connector '{}'", scope));
    }

    events.emit(AppEvent::ConnectorOpened {
        scope: scope.to_string(),
        bucket: connector.bucket_name().to_string(),
        backend,
    });

    Ok(connector)
}

/// Releases the connector's client once the server has drained
pub async fn close(connector: &BucketConnector, events: &Arc<EventBus>) -> Result<()> {
    connector
        .close()
        .await
        .with_context(|| format!("failed to close connector '{}'", connector.scope()))?;

    events.emit(AppEvent::ConnectorClosed {
        scope: connector.scope().to_string(),
    });

    Ok(())
}
