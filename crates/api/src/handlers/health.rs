use super::models::AppState;
use crate::errors::ApiError;
use crate::models::HealthResponse;
use axum::{extract::State, response::Json};

/// Reports ready only while the connector holds a live client
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.connector.client()?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        scope: state.connector.scope().to_string(),
        bucket: state.connector.bucket_name().to_string(),
    }))
}
