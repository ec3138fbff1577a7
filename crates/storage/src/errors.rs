use crate::LifecycleState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Connector '{scope}' is not ready (state: {state})")]
    NotReady { scope: String, state: LifecycleState },

    #[error("Connector '{0}' is already open")]
    AlreadyOpen(String),

    #[error("Invalid base64 payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),

    #[error("Invalid storage configuration: {0}")]
    ConfigError(String),

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Upload failed for '{0}': {1}")]
    UploadError(String, String),

    #[error("Read failed for '{0}': {1}")]
    ReadError(String, String),

    #[error("Delete failed for '{0}': {1}")]
    DeleteError(String, String),

    #[error("Listing failed for prefix '{0}': {1}")]
    ListError(String, String),

    #[error("{op} timed out after {secs}s")]
    Timeout { op: &'static str, secs: u64 },

    #[error("Close failed: {0}")]
    CloseError(String),

    #[error("Storage backend unavailable: {0}")]
    BackendUnavailable(String),
}
