use crate::handlers::{delete_object, delete_prefix, get_object, health, put_object, upload, AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};

/// Connector routes without middleware; the binary layers limits and CORS on top
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload))
        .route(
            "/objects/*path",
            get(get_object).put(put_object).delete(delete_object),
        )
        .route("/prefixes/*prefix", delete(delete_prefix))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use bucket_config::{BackendKind, ConnectorSettings};
    use bucket_storage::{BucketConnector, InMemoryClient, StorageClient};
    use bytes::Bytes;
    use std::sync::Arc;

    const BUCKET: &str = "files.example.com";

    fn create_test_app() -> (TestServer, Arc<BucketConnector>, Arc<InMemoryClient>) {
        let settings = ConnectorSettings {
            backend: BackendKind::Memory,
            bucket_name: BUCKET.to_string(),
            ..Default::default()
        };
        let connector = Arc::new(BucketConnector::new("api-test", settings));
        let client = Arc::new(InMemoryClient::new());
        connector.open_with_client(client.clone()).unwrap();

        let server = TestServer::new(routes(AppState::new(Arc::clone(&connector)))).unwrap();
        (server, connector, client)
    }

    #[tokio::test]
    async fn test_upload_returns_public_url() {
        let (app, _connector, client) = create_test_app();

        let response = app
            .post("/upload")
            .json(&serde_json::json!({
                "file_name": "hello.txt",
                "category": "notes",
                "rowData": STANDARD.encode("hello"),
            }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["url"], format!("https://{}/notes/hello.txt", BUCKET));
        assert_eq!(&client.read_object(BUCKET, "notes/hello.txt").await.unwrap()[..], b"hello");
    }

    #[tokio::test]
    async fn test_upload_bad_base64_is_bad_request() {
        let (app, _connector, client) = create_test_app();

        let response = app
            .post("/upload")
            .json(&serde_json::json!({ "category": "notes", "rowData": "***" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"]["code"], "INVALID_PAYLOAD");
        assert!(client.is_empty());
    }

    #[tokio::test]
    async fn test_put_get_delete_object() {
        let (app, _connector, _client) = create_test_app();

        let response = app
            .put("/objects/raw/data.json")
            .bytes(Bytes::from_static(b"{}"))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["url"], format!("https://{}/raw/data.json", BUCKET));

        let response = app.get("/objects/raw/data.json").await;
        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "application/json");
        assert_eq!(&response.as_bytes()[..], b"{}");

        let response = app.delete("/objects/raw/data.json").await;
        response.assert_status(StatusCode::NO_CONTENT);

        let response = app.get("/objects/raw/data.json").await;
        response.assert_status_not_found();

        // Deleting again is still a success
        let response = app.delete("/objects/raw/data.json").await;
        response.assert_status(StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_delete_prefix() {
        let (app, connector, client) = create_test_app();
        for path in ["tmp/1", "tmp/2", "keep/1"] {
            connector.write_raw(path, "x").await.unwrap();
        }

        let response = app.delete("/prefixes/tmp/").await;

        response.assert_status(StatusCode::NO_CONTENT);
        assert_eq!(client.len(), 1);
    }

    #[tokio::test]
    async fn test_closed_connector_is_unavailable() {
        let (app, connector, _client) = create_test_app();
        app.get("/health").await.assert_status_ok();

        connector.close().await.unwrap();

        let response = app.get("/health").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"]["code"], "NOT_READY");
    }
}
