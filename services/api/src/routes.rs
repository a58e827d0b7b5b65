//! API service routes

use axum::{
    Json, Router,
    extract::{Multipart, State},
    response::IntoResponse,
    routing::{get, post},
};
use common::error::StorageError;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::{
    error::{ApiError, ApiResult},
    listing,
    models::{RenderListResponse, RenderRequest, RenderResponse, UploadResponse},
    renderer::validate_output_name,
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let serve_renders = ServeDir::new(state.renderer.renders_dir());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/upload", post(upload_asset))
        .route("/api/render", post(render_video))
        .route("/api/renders", get(list_renders))
        .nest_service("/renders", serve_renders)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Service identity endpoint
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "service": "render-api",
        "status": "running"
    }))
}

/// Health check endpoint; reports whether storage credentials are present
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "s3": state.asset_store.is_some()
    }))
}

/// Upload an asset to the object store, returning its public URL
pub async fn upload_asset(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let store = state.asset_store.as_ref().ok_or_else(|| {
        StorageError::Configuration("add AWS credentials to the environment".to_string())
    })?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload.bin").to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file field: {e}")))?;

        let asset = store.upload(&filename, content.to_vec()).await?;

        return Ok(Json(UploadResponse {
            status: "success",
            url: asset.url,
            filename,
            key: asset.key,
        }));
    }

    Err(ApiError::BadRequest("Missing 'file' field".to_string()))
}

/// Render a composition to an MP4 file
pub async fn render_video(
    State(state): State<AppState>,
    Json(payload): Json<RenderRequest>,
) -> ApiResult<Json<RenderResponse>> {
    if let Some(name) = payload.output_name.as_deref() {
        if !validate_output_name(name) {
            return Err(ApiError::BadRequest(
                "Invalid output_name: use letters, digits, '.', '_' or '-'".to_string(),
            ));
        }
    }

    let success = state
        .renderer
        .render(&payload.code, payload.output_name.as_deref())
        .await?;

    Ok(Json(RenderResponse {
        status: "success",
        video_url: success.video_url,
        filename: success.filename,
        file_size_mb: success.file_size_mb,
        duration: success.duration,
        width: success.width,
        height: success.height,
    }))
}

/// List rendered files, newest first
pub async fn list_renders(State(state): State<AppState>) -> ApiResult<Json<RenderListResponse>> {
    let renders = listing::list_renders(
        state.renderer.renders_dir(),
        &state.server_config.public_base_url,
    )
    .map_err(|e| {
        tracing::error!("Failed to list renders: {}", e);
        ApiError::Internal(format!("Failed to list renders: {e}"))
    })?;

    Ok(Json(RenderListResponse { renders }))
}
