use super::models::AppState;
use bucket_storage::BucketConnector;
use std::sync::Arc;

impl AppState {
    pub fn new(connector: Arc<BucketConnector>) -> Self {
        Self { connector }
    }
}
