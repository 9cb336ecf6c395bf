use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::app::AppState;
use crate::application::dto::crop_session_dto::{ConfirmCropDto, CropSessionDto, DrawingTitleDto};
use crate::presentation::errors::ApiError;
use crate::presentation::routes::helpers::{FormPart, log_request, map_api_error, next_part, parse_bool};

/// Start a crop session from multipart `files` parts and an optional
/// `enable_crop` field (default true)
pub async fn start_crop_session(
    State(app_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CropSessionDto>), ApiError> {
    let mut files = Vec::new();
    let mut enable_crop = true;

    while let Some(part) = next_part(&mut multipart).await? {
        match part {
            FormPart::File(_, file) => files.push(file),
            FormPart::Text(name, value) if name == "enable_crop" => {
                enable_crop = parse_bool("enable_crop", &value)?;
            }
            FormPart::Text(name, _) => {
                tracing::debug!("Ignoring form field {}", name);
            }
        }
    }

    log_request(format!("start_crop_session files={} crop={}", files.len(), enable_crop));

    let session = app_state
        .crop_session_service
        .start(files, enable_crop)
        .await
        .map_err(map_api_error("Failed to start crop session"))?;

    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn get_crop_session(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CropSessionDto>, ApiError> {
    log_request(format!("get_crop_session {}", id));

    app_state
        .crop_session_service
        .get(id)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to get crop session"))
}

pub async fn confirm_crop(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<ConfirmCropDto>,
) -> Result<Json<CropSessionDto>, ApiError> {
    log_request(format!("confirm_crop {}", id));

    app_state
        .crop_session_service
        .confirm(id, request)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to confirm crop"))
}

pub async fn cancel_crop(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CropSessionDto>, ApiError> {
    log_request(format!("cancel_crop {}", id));

    app_state
        .crop_session_service
        .cancel(id)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to cancel crop"))
}

pub async fn set_drawing_title(
    State(app_state): State<Arc<AppState>>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(request): Json<DrawingTitleDto>,
) -> Result<Json<CropSessionDto>, ApiError> {
    log_request(format!("set_drawing_title {} {}", id, index));

    app_state
        .crop_session_service
        .set_title(id, index, request.title)
        .await
        .map(Json)
        .map_err(map_api_error("Failed to set drawing title"))
}
