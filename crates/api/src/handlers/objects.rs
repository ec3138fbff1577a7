use super::models::AppState;
use crate::errors::ApiError;
use crate::models::UploadResponse;
use axum::{
    extract::{Path as AxumPath, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use bucket_storage::UploadRequest;
use bytes::Bytes;

/// POST /upload: base64 JSON payload stored under its category
pub async fn upload(
    State(state): State<AppState>,
    Json(req): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    let url = state.connector.upload_encoded(&req).await?;
    Ok(Json(UploadResponse { url }))
}

/// PUT /objects/*path: raw body stored at exactly `path`
pub async fn put_object(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
    body: Bytes,
) -> Result<Json<UploadResponse>, ApiError> {
    let url = state.connector.write_raw(&path, body).await?;
    Ok(Json(UploadResponse { url }))
}

pub async fn get_object(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Result<Response, ApiError> {
    let content = state.connector.read_object(&path).await?;
    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    Ok(([(header::CONTENT_TYPE, mime.to_string())], content).into_response())
}

pub async fn delete_object(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Result<StatusCode, ApiError> {
    state.connector.delete_object(&path).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_prefix(
    State(state): State<AppState>,
    AxumPath(prefix): AxumPath<String>,
) -> Result<StatusCode, ApiError> {
    tracing::info!("Deleting objects with prefix '{}'", prefix);
    state.connector.delete_objects_with_prefix(&prefix).await?;
    Ok(StatusCode::NO_CONTENT)
}
