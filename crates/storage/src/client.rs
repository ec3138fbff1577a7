use crate::StorageError;
use bucket_config::{BackendKind, ConnectorSettings};
use bytes::Bytes;
use std::sync::Arc;

/// Access-control entry granting `role` to `entity` on an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AclRule {
    pub entity: &'static str,
    pub role: &'static str,
}

/// The only rule the connector ever writes: anyone may read the object.
pub const PUBLIC_READ: AclRule = AclRule {
    entity: "allUsers",
    role: "READER",
};

/// Metadata of an object as reported by the remote store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub name: String,
    pub size: u64,
}

/// Object storage client abstraction
///
/// Implementations must be safe to share between concurrent callers; the
/// connector hands out clones of one `Arc<dyn StorageClient>` and does no
/// locking of its own around remote calls.
#[async_trait::async_trait]
pub trait StorageClient: Send + Sync {
    /// Writes `data` to `path`, applying `acl` as part of the write
    async fn write_object(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        acl: &[AclRule],
    ) -> Result<StoredObject, StorageError>;

    /// Reads the full content of an object
    async fn read_object(&self, bucket: &str, path: &str) -> Result<Bytes, StorageError>;

    /// Deletes one object, failing with [`StorageError::NotFound`] if it does not exist
    async fn delete_object(&self, bucket: &str, path: &str) -> Result<(), StorageError>;

    /// Lists every object whose name starts with `prefix`, in name order
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<StoredObject>, StorageError>;

    /// Releases the client's resources
    async fn close(&self) -> Result<(), StorageError>;

    /// Short backend name used in logs
    fn name(&self) -> &'static str;
}

/// Builds the client selected by `settings.backend`
pub async fn connect(settings: &ConnectorSettings) -> Result<Arc<dyn StorageClient>, StorageError> {
    match settings.backend {
        BackendKind::Memory => Ok(Arc::new(crate::InMemoryClient::new()) as Arc<dyn StorageClient>),
        #[cfg(feature = "gcs")]
        BackendKind::Gcs => {
            let client = crate::GcsClient::from_credentials_file(&settings.json_key).await?;
            Ok(Arc::new(client) as Arc<dyn StorageClient>)
        }
        #[cfg(not(feature = "gcs"))]
        BackendKind::Gcs => Err(StorageError::BackendUnavailable(
            "GCS backend selected but not compiled. Rebuild with --features gcs to enable it."
                .to_string(),
        )),
    }
}
