use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::app::AppState;
use crate::presentation::errors::ApiError;
use crate::presentation::routes::helpers::log_request;

/// Serve an object of the in-memory storage backend
pub async fn get_object(
    State(app_state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    log_request(format!("get_object {}", path));

    let object = app_state
        .memory_storage
        .as_ref()
        .and_then(|storage| storage.get(&path))
        .ok_or_else(|| ApiError::NotFound(format!("Object {}", path)))?;

    Ok((
        [
            (header::CONTENT_TYPE, object.content_type),
            (header::CACHE_CONTROL, format!("max-age={}", object.cache_control)),
        ],
        object.bytes,
    )
        .into_response())
}
