/// Default values for configuration fields

pub const DEFAULT_SCOPE: &str = "connector";
pub const DEFAULT_BUCKET_NAME: &str = "example.com";
pub const DEFAULT_JSON_KEY: &str = "gcp.json";

pub fn host() -> String {
    "0.0.0.0".to_string()
}

pub fn port() -> u16 {
    8080
}

pub fn timeout_secs() -> u64 {
    60
}

pub fn max_body_size() -> usize {
    32
}

pub fn max_concurrent_requests() -> usize {
    1000
}

pub fn allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

pub fn server_settings() -> super::models::ServerSettings {
    super::models::ServerSettings {
        host: host(),
        port: port(),
        timeout_secs: timeout_secs(),
        max_body_size_mb: max_body_size(),
        max_concurrent_requests: max_concurrent_requests(),
        allowed_origins: allowed_origins(),
    }
}

// Connector defaults
pub fn backend() -> super::models::BackendKind {
    super::models::BackendKind::Gcs
}

pub fn bucket_name() -> String {
    DEFAULT_BUCKET_NAME.to_string()
}

pub fn json_key() -> String {
    DEFAULT_JSON_KEY.to_string()
}

pub fn connector_timeout_secs() -> u64 {
    60
}

pub fn connector_settings() -> super::models::ConnectorSettings {
    super::models::ConnectorSettings {
        backend: backend(),
        bucket_name: bucket_name(),
        json_key: json_key(),
        timeout_secs: connector_timeout_secs(),
    }
}

pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# ===============================================================================
# Bucket Server Configuration
# ===============================================================================

[server]
host = "0.0.0.0"                     # Server bind address (0.0.0.0 = all interfaces)
port = 8080                          # Server port
timeout_secs = 60                    # Request timeout in seconds
max_body_size_mb = 32                # Max upload body size in MB
max_concurrent_requests = 1000       # Max simultaneous connections
allowed_origins = ["*"]              # "*" = all origins | ["https://example.com"] for production

# ===============================================================================
# CONNECTOR SCOPES
# ===============================================================================
# Each table below is one connector scope. The server uses the scope named
# by BUCKET_SCOPE (default "connector").

# backend = "gcs" needs a binary built with `--features gcs`; without it the
# server stops at startup. Use "memory" for a local, non-persistent store.
[connector]
backend = "gcs"                      # Storage backend: "gcs" or "memory"
bucket_name = "example.com"          # Bucket name, also the host of produced URLs
json_key = "gcp.json"                # Path to the service account credential file
timeout_secs = 60                    # Deadline for each remote call (0 = none)
"#;
