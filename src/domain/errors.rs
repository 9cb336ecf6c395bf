use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid crop region: {0}")]
    InvalidRegion(String),

    #[error("Failed to decode image: {0}")]
    ImageDecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Upload failed: {0}")]
    UploadError(String),

    #[error("Failed to persist record: {0}")]
    PersistError(String),

    #[error("Failed to deliver message: {0}")]
    DeliveryError(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}
