use crate::client::{self, StorageClient, PUBLIC_READ};
use crate::request::UploadRequest;
use crate::StorageError;
use bucket_config::ConnectorSettings;
use bytes::Bytes;
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

type Result<T> = std::result::Result<T, StorageError>;

/// Lifecycle of a connector: `Uninitialized → Ready → Closed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Ready,
    Closed,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Uninitialized => f.write_str("uninitialized"),
            LifecycleState::Ready => f.write_str("ready"),
            LifecycleState::Closed => f.write_str("closed"),
        }
    }
}

enum State {
    Uninitialized,
    Ready(Arc<dyn StorageClient>),
    Closed,
}

impl State {
    fn lifecycle(&self) -> LifecycleState {
        match self {
            State::Uninitialized => LifecycleState::Uninitialized,
            State::Ready(_) => LifecycleState::Ready,
            State::Closed => LifecycleState::Closed,
        }
    }
}

/// Owns one object storage client for a configuration scope and exposes
/// upload, URL construction and deletion on top of it.
///
/// Must be opened once before use and closed once at shutdown. Every
/// operation outside the ready state fails with [`StorageError::NotReady`].
pub struct BucketConnector {
    scope: String,
    settings: ConnectorSettings,
    state: RwLock<State>,
    span: tracing::Span,
}

impl BucketConnector {
    pub fn new(scope: impl Into<String>, settings: ConnectorSettings) -> Self {
        let scope = scope.into();
        let span = tracing::info_span!("bucket_connector", scope = %scope);

        Self {
            scope,
            settings,
            state: RwLock::new(State::Uninitialized),
            span,
        }
    }

    /// Replaces the span every log line and remote call is recorded under
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn settings(&self) -> &ConnectorSettings {
        &self.settings
    }

    pub fn bucket_name(&self) -> &str {
        &self.settings.bucket_name
    }

    pub fn state(&self) -> LifecycleState {
        self.state.read().lifecycle()
    }

    /// Builds the configured client from the credential file and moves to ready
    pub async fn open(&self) -> Result<()> {
        self.ensure_uninitialized()?;

        tracing::info!(
            parent: &self.span,
            bucket_name = %self.settings.bucket_name,
            json_key = %self.settings.json_key,
            backend = %self.settings.backend,
            "Starting BucketConnector"
        );

        let client = client::connect(&self.settings)
            .instrument(self.span.clone())
            .await
            .map_err(|e| {
                tracing::error!(parent: &self.span, "Failed to create storage client: {}", e);
                e
            })?;

        self.install(client)
    }

    /// Moves to ready with an already constructed client
    pub fn open_with_client(&self, client: Arc<dyn StorageClient>) -> Result<()> {
        self.install(client)
    }

    /// Releases the client. In-flight calls keep their own handle until they finish.
    pub async fn close(&self) -> Result<()> {
        let client = {
            let mut state = self.state.write();
            match std::mem::replace(&mut *state, State::Closed) {
                State::Ready(client) => client,
                other => {
                    let lifecycle = other.lifecycle();
                    *state = other;
                    return Err(self.not_ready(lifecycle));
                }
            }
        };

        let result = client.close().instrument(self.span.clone()).await;
        match &result {
            Ok(()) => tracing::info!(parent: &self.span, "Stopped BucketConnector"),
            Err(e) => tracing::error!(parent: &self.span, "Failed to close storage client: {}", e),
        }
        result
    }

    /// Underlying client, for callers needing direct access
    pub fn client(&self) -> Result<Arc<dyn StorageClient>> {
        match &*self.state.read() {
            State::Ready(client) => Ok(Arc::clone(client)),
            other => Err(self.not_ready(other.lifecycle())),
        }
    }

    /// Public URL an object at `path` is served from
    pub fn public_url(&self, path: &str) -> String {
        crate::url::public_url(&self.settings.bucket_name, path)
    }

    /// Decodes a base64 upload and stores it at `{category}/{name}`, returning its public URL
    pub async fn upload_encoded(&self, req: &UploadRequest) -> Result<String> {
        let client = self.client()?;

        let content = req.decode().map_err(|e| {
            tracing::error!(parent: &self.span, category = %req.category, "Invalid base64 payload: {}", e);
            StorageError::InvalidPayload(e)
        })?;

        let path = req.object_path();
        self.write(client.as_ref(), &path, Bytes::from(content)).await
    }

    /// Stores `content` at exactly `path`, returning its public URL
    pub async fn write_raw(&self, path: &str, content: impl Into<Bytes>) -> Result<String> {
        let client = self.client()?;
        self.write(client.as_ref(), path, content.into()).await
    }

    /// Reads an object back from the bucket
    pub async fn read_object(&self, path: &str) -> Result<Bytes> {
        let client = self.client()?;
        self.deadline("read", client.read_object(&self.settings.bucket_name, path))
            .await
    }

    /// Deletes one object; a missing object counts as deleted
    pub async fn delete_object(&self, path: &str) -> Result<()> {
        let client = self.client()?;

        match self
            .deadline("delete", client.delete_object(&self.settings.bucket_name, path))
            .await
        {
            Ok(()) => Ok(()),
            Err(StorageError::NotFound(_)) => {
                tracing::debug!(parent: &self.span, path, "Object already absent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(parent: &self.span, path, "Delete failed: {}", e);
                Err(e)
            }
        }
    }

    /// Deletes every object whose name starts with `prefix`, in listing order.
    ///
    /// Objects that vanish between listing and deletion are skipped. Any other
    /// failure stops the sweep and is returned; objects after it are left in place.
    pub async fn delete_objects_with_prefix(&self, prefix: &str) -> Result<()> {
        let client = self.client()?;
        let bucket = &self.settings.bucket_name;

        if prefix.is_empty() {
            tracing::warn!(parent: &self.span, bucket = %bucket, "Deleting with an empty prefix clears the whole bucket");
        }

        let objects = self
            .deadline("list", client.list_objects(bucket, prefix))
            .await?;

        for object in &objects {
            match self
                .deadline("delete", client.delete_object(bucket, &object.name))
                .await
            {
                Ok(()) | Err(StorageError::NotFound(_)) => {}
                Err(e) => {
                    tracing::error!(parent: &self.span, path = %object.name, prefix, "Prefix delete aborted: {}", e);
                    return Err(e);
                }
            }
        }

        tracing::debug!(parent: &self.span, prefix, count = objects.len(), "Prefix delete complete");
        Ok(())
    }

    async fn write(&self, client: &dyn StorageClient, path: &str, data: Bytes) -> Result<String> {
        let size = data.len();
        let object = self
            .deadline(
                "upload",
                client.write_object(&self.settings.bucket_name, path, data, &[PUBLIC_READ]),
            )
            .await
            .map_err(|e| {
                tracing::error!(parent: &self.span, path, "Upload failed: {}", e);
                e
            })?;

        let url = crate::url::public_url(&object.bucket, &object.name);
        tracing::info!(parent: &self.span, path, size, url = %url, "Upload complete");
        Ok(url)
    }

    /// Runs a remote call under the span, bounded by `timeout_secs` when set
    async fn deadline<T, F>(&self, op: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let fut = fut.instrument(self.span.clone());
        let secs = self.settings.timeout_secs;
        if secs == 0 {
            return fut.await;
        }

        match tokio::time::timeout(Duration::from_secs(secs), fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(parent: &self.span, op, secs, "Storage call timed out");
                Err(StorageError::Timeout { op, secs })
            }
        }
    }

    fn ensure_uninitialized(&self) -> Result<()> {
        match self.state.read().lifecycle() {
            LifecycleState::Uninitialized => Ok(()),
            LifecycleState::Ready => Err(StorageError::AlreadyOpen(self.scope.clone())),
            LifecycleState::Closed => Err(self.not_ready(LifecycleState::Closed)),
        }
    }

    fn install(&self, client: Arc<dyn StorageClient>) -> Result<()> {
        let mut state = self.state.write();
        match state.lifecycle() {
            LifecycleState::Uninitialized => {
                tracing::debug!(parent: &self.span, backend = client.name(), "Storage client ready");
                *state = State::Ready(client);
                Ok(())
            }
            LifecycleState::Ready => Err(StorageError::AlreadyOpen(self.scope.clone())),
            LifecycleState::Closed => Err(self.not_ready(LifecycleState::Closed)),
        }
    }

    fn not_ready(&self, state: LifecycleState) -> StorageError {
        StorageError::NotReady {
            scope: self.scope.clone(),
            state,
        }
    }
}
