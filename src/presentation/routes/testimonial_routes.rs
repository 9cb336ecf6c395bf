use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::app::AppState;
use crate::application::dto::testimonial_dto::TestimonialDto;
use crate::domain::models::drawing::DrawingFile;
use crate::domain::models::testimonial::TestimonialDraft;
use crate::presentation::errors::ApiError;
use crate::presentation::routes::helpers::{FormPart, log_request, map_api_error, next_part};

pub async fn get_testimonials(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<TestimonialDto>>, ApiError> {
    log_request("get_testimonials");

    let testimonials = app_state
        .testimonial_service
        .get_all()
        .await
        .map_err(map_api_error("Failed to load testimonials"))?;

    Ok(Json(testimonials.into_iter().map(TestimonialDto::from).collect()))
}

/// Submit a testimonial.
///
/// Text parts: `name`, `quote`, `course`, `custom_course`, `stars`, and either
/// `crop_session` (drawings and titles of a finished crop session) or one
/// `drawing_title` per `drawing` file part. The optional `profile` file part
/// becomes the avatar.
pub async fn submit_testimonial(
    State(app_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<TestimonialDto>), ApiError> {
    let mut draft = TestimonialDraft::default();
    let mut crop_session = None;

    while let Some(part) = next_part(&mut multipart).await? {
        match part {
            FormPart::Text(name, value) => match name.as_str() {
                "name" => draft.name = value,
                "quote" => draft.quote = value,
                "course" => draft.course = value,
                "custom_course" => draft.custom_course = value,
                "stars" => {
                    draft.stars = value.trim().parse().map_err(|_| {
                        ApiError::BadRequest(format!("stars must be a number, got '{}'", value))
                    })?;
                }
                "crop_session" => {
                    let id = Uuid::parse_str(value.trim()).map_err(|_| {
                        ApiError::BadRequest(format!("Invalid crop session id '{}'", value))
                    })?;
                    crop_session = Some(id);
                }
                "drawing_title" => draft.drawing_titles.push(value),
                other => tracing::debug!("Ignoring form field {}", other),
            },
            FormPart::File(name, file) => match name.as_str() {
                "profile" => draft.profile_image = Some(file),
                "drawing" => draft.drawing_files.push(DrawingFile::Original(file)),
                other => tracing::debug!("Ignoring file field {}", other),
            },
        }
    }

    log_request(format!(
        "submit_testimonial drawings={} session={:?}",
        draft.drawing_files.len(),
        crop_session
    ));

    let mut uploaded_files = draft
        .profile_image
        .iter()
        .chain(draft.drawing_files.iter().filter_map(|drawing| match drawing {
            DrawingFile::Original(file) => Some(file),
            DrawingFile::Cropped(_) => None,
        }));
    if let Some(file) = uploaded_files.find(|file| !file.is_image()) {
        return Err(ApiError::BadRequest(format!(
            "{} is not an image ({})",
            file.name, file.content_type
        )));
    }

    let session = match crop_session {
        Some(id) => {
            if !draft.drawing_files.is_empty() {
                return Err(ApiError::BadRequest(
                    "Send drawings either through a crop session or as files, not both".to_string(),
                ));
            }

            let drawings = app_state
                .crop_session_service
                .take(id)
                .await
                .map_err(map_api_error("Failed to take crop session"))?;
            draft.drawing_files = drawings.files.clone();
            draft.drawing_titles = drawings.titles.clone();
            Some((id, drawings))
        }
        None => None,
    };

    match app_state.testimonial_service.submit(&draft).await {
        Ok(persisted) => Ok((StatusCode::CREATED, Json(TestimonialDto::from(persisted)))),
        Err(error) => {
            // The drawings stay available for another attempt
            if let Some((id, drawings)) = session {
                app_state.crop_session_service.restore(id, drawings).await;
            }
            Err(map_api_error("Failed to submit testimonial")(error))
        }
    }
}
