use crate::catalog::find_app;
use crate::error::ApiError;
use crate::state::AppState;
use crate::uploads::{content_type_for, is_valid_path_component};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

/// Default icon served when an app has none of its own
const DEFAULT_ICON: &str = "default_icon.png";

/// Serves a previously uploaded file by name
pub async fn serve_file(
    Path(filename): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    if !is_valid_path_component(&filename) {
        tracing::warn!("Rejected file request with unsafe name: {}", filename);
        return Err(ApiError::NotFound("File not found".to_string()));
    }

    let path = state.uploads_dir.join(&filename);
    if !path.is_file() {
        return Err(ApiError::NotFound("File not found".to_string()));
    }

    stream_file(&path, content_type_for(&filename), None).await
}

/// Serves an app's icon, falling back to the shared default icon
pub async fn serve_icon(
    Path(app_id): Path<u64>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let doc = state.store.load();

    if find_app(&doc, app_id).is_some() {
        let icon = state.uploads_dir.join(format!("icon_{}.png", app_id));
        if icon.is_file() {
            return stream_file(&icon, "image/png", None).await;
        }
    }

    let fallback = state.uploads_dir.join(DEFAULT_ICON);
    if fallback.is_file() {
        return stream_file(&fallback, "image/png", None).await;
    }

    Err(ApiError::NotFound("Icon not found".to_string()))
}

/// Streams a file from disk. When `attachment_name` is set the response asks
/// the client to download rather than display it.
pub async fn stream_file(
    path: &std::path::Path,
    content_type: &str,
    attachment_name: Option<&str>,
) -> Result<Response, ApiError> {
    let file = File::open(path).await.map_err(|err| {
        tracing::error!("Failed to open {}: {}", path.display(), err);
        ApiError::internal(err)
    })?;

    let size = file.metadata().await.map_err(ApiError::internal)?.len();
    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, size.to_string());

    if let Some(name) = attachment_name {
        builder = builder.header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", name),
        );
    }

    builder.body(body).map_err(ApiError::internal)
}
