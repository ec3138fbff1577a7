use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    // Application lifecycle
    Starting,
    Ready { addr: String, scope: String },
    Shutdown,

    // Configuration
    ConfigLoading { path: String },
    ConfigLoaded { scope: String, bucket: String },
    ConfigCreated { path: String },
    ConfigMigrated { added_fields: Vec<String> },

    // Connector lifecycle
    ConnectorOpened { scope: String, bucket: String, backend: String },
    ConnectorClosed { scope: String },

    // Errors
    Error { context: String, error: String },
}

pub struct EventBus {
    pub(super) silent_mode: bool,
}
