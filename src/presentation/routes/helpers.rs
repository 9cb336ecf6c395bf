use std::fmt::Display;

use axum::extract::Multipart;
use axum::extract::multipart::Field;

use crate::domain::models::selected_file::SelectedFile;
use crate::infrastructure::logging::logger;
use crate::presentation::errors::ApiError;

pub fn log_request(request: impl AsRef<str>) {
    logger::debug(&format!("Request: {}", request.as_ref()));
}

pub fn map_api_error<E>(context: impl AsRef<str>) -> impl FnOnce(E) -> ApiError
where
    E: Display + Into<ApiError>,
{
    let context = context.as_ref().to_string();

    move |error| {
        logger::error(&format!("{}: {}", context, error));
        error.into()
    }
}

/// One multipart part, read completely
pub enum FormPart {
    Text(String, String),
    File(String, SelectedFile),
}

/// Next part of a multipart body. Parts carrying a file name are files.
pub async fn next_part(multipart: &mut Multipart) -> Result<Option<FormPart>, ApiError> {
    let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    else {
        return Ok(None);
    };

    let name = field.name().unwrap_or_default().to_string();
    match field.file_name().map(str::to_string) {
        Some(file_name) => {
            let content_type = field.content_type().map(str::to_string);
            let bytes = read_bytes(field).await?;
            Ok(Some(FormPart::File(name, SelectedFile::new(file_name, content_type, bytes))))
        }
        None => {
            let text = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Invalid form field {}: {}", name, e)))?;
            Ok(Some(FormPart::Text(name, text)))
        }
    }
}

async fn read_bytes(field: Field<'_>) -> Result<bytes::Bytes, ApiError> {
    field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read uploaded file: {}", e)))
}

pub fn parse_bool(field: &str, value: &str) -> Result<bool, ApiError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        other => Err(ApiError::BadRequest(format!("{} must be a boolean, got '{}'", field, other))),
    }
}
