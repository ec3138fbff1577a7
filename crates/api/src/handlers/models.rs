use bucket_storage::BucketConnector;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub(super) connector: Arc<BucketConnector>,
}
