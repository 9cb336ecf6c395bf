use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::app::AppState;
use crate::domain::models::contact_message::ContactMessage;
use crate::presentation::errors::ApiError;
use crate::presentation::routes::helpers::{log_request, map_api_error};

pub async fn send_contact_message(
    State(app_state): State<Arc<AppState>>,
    Json(message): Json<ContactMessage>,
) -> Result<StatusCode, ApiError> {
    log_request("send_contact_message");

    app_state
        .contact_service
        .send(&message)
        .await
        .map_err(map_api_error("Failed to send contact message"))?;

    Ok(StatusCode::ACCEPTED)
}
