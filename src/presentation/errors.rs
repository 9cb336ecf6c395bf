use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::application::errors::ApplicationError;
use crate::domain::errors::DomainError;

#[derive(Error, Debug, Serialize)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the user
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::BadGateway(msg)
            | ApiError::InternalServerError(msg) => msg,
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        match error {
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::CropError(msg) => ApiError::BadRequest(msg),
            ApplicationError::InvalidState(msg) => ApiError::Conflict(msg),
            ApplicationError::NotFound(msg) => ApiError::NotFound(msg),
            ApplicationError::UpstreamError(msg) => ApiError::BadGateway(msg),
            ApplicationError::InternalError(msg) => ApiError::InternalServerError(msg),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        ApplicationError::from(error).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_errors_to_statuses() {
        let cases = [
            (DomainError::ValidationError("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::InvalidRegion("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::InvalidState("x".into()), StatusCode::CONFLICT),
            (DomainError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (DomainError::UploadError("x".into()), StatusCode::BAD_GATEWAY),
            (DomainError::PersistError("x".into()), StatusCode::BAD_GATEWAY),
            (DomainError::InternalError("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }

    #[test]
    fn message_has_no_status_prefix() {
        let error = ApiError::from(DomainError::ValidationError("Please enter your name.".into()));
        assert_eq!(error.message(), "Please enter your name.");
    }
}
