//! Public retrieval of stored media, the target of `Media` URLs.

use axum::{
    Router,
    extract::{Path, State},
    http::header::CONTENT_TYPE,
    response::IntoResponse,
    routing::get,
};

use crate::AppState;
use crate::error::ApiError;

/// Content type for a stored key, from its extension.
fn content_type_for(key: &str) -> &'static str {
    let ext = key.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// GET `/files/{key}`
/// Only generated upload names resolve; anything else is a 404.
async fn serve_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let data = state.storage.read(&key).await?;
    Ok(([(CONTENT_TYPE, content_type_for(&key))], data))
}

/// Creates file routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/files/{key}", get(serve_file))
}
