mod bootstrap;

use bucket_api::AppState;
use bucket_events::{AppEvent, EventBus};
use crate::bootstrap::{config, connector, logging, router};
use anyhow::Result;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    logging::initialize();

    let events = EventBus::new(false);
    events.emit(AppEvent::Starting);

    let config_path = std::env::var("BUCKET_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let scope = std::env::var("BUCKET_SCOPE").unwrap_or_else(|_| bucket_config::DEFAULT_SCOPE.to_string());
    let config = config::load(&config_path, &scope, &events).await?;

    let connector = connector::open(&config, &scope, &events).await?;

    let app = router::build(&config, AppState::new(Arc::clone(&connector)));
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = bind_server(&addr).await?;

    events.emit(AppEvent::Ready {
        addr: addr.to_string(),
        scope: scope.clone(),
    });

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
        tracing::info!("Shutdown signal received, initiating graceful shutdown...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    // In-flight requests are drained, the client can go
    connector::close(&connector, &events).await?;
    events.emit(AppEvent::Shutdown);
    Ok(())
}

async fn bind_server(addr: &str) -> Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            let port = addr.split(':').last().unwrap_or("unknown");
            tracing::error!("❌ Port {} is already in use", port);
            tracing::error!("Change the port in config.toml or stop the other application");
        } else {
            tracing::error!("❌ Failed to bind server on {}: {}", addr, e);
        }
        anyhow::anyhow!("Failed to bind server: {}", e)
    })
}
