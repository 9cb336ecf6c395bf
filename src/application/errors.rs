use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    CropError(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    UpstreamError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<DomainError> for ApplicationError {
    fn from(error: DomainError) -> Self {
        let message = error.to_string();
        match error {
            DomainError::NotFound(msg) => ApplicationError::NotFound(msg),
            DomainError::ValidationError(msg) => ApplicationError::ValidationError(msg),
            DomainError::InvalidRegion(_)
            | DomainError::ImageDecodeError(_)
            | DomainError::EncodeError(_) => ApplicationError::CropError(message),
            DomainError::InvalidState(_) => ApplicationError::InvalidState(message),
            DomainError::UploadError(_)
            | DomainError::PersistError(_)
            | DomainError::DeliveryError(_) => ApplicationError::UpstreamError(message),
            DomainError::InternalError(msg) => ApplicationError::InternalError(msg),
        }
    }
}
