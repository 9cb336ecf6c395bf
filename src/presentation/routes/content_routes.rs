use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::app::AppState;
use crate::application::dto::content_dto::{LandingPageDto, PanelDto};
use crate::domain::models::content::{Artwork, ClassOffering, ContactInfo};
use crate::domain::models::gallery::GalleryItem;
use crate::presentation::errors::ApiError;
use crate::presentation::routes::helpers::{log_request, map_api_error};

pub async fn get_landing_page(State(app_state): State<Arc<AppState>>) -> Json<LandingPageDto> {
    log_request("get_landing_page");
    Json(app_state.content_service.landing_page().await)
}

pub async fn get_artworks(State(app_state): State<Arc<AppState>>) -> Json<PanelDto<Vec<Artwork>>> {
    log_request("get_artworks");
    Json(app_state.content_service.artworks().await)
}

pub async fn get_classes(
    State(app_state): State<Arc<AppState>>,
) -> Json<PanelDto<Vec<ClassOffering>>> {
    log_request("get_classes");
    Json(app_state.content_service.classes().await)
}

pub async fn get_contact_info(State(app_state): State<Arc<AppState>>) -> Json<PanelDto<ContactInfo>> {
    log_request("get_contact_info");
    Json(app_state.content_service.contact_info().await)
}

pub async fn get_gallery(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<GalleryItem>>, ApiError> {
    log_request("get_gallery");

    app_state
        .testimonial_service
        .gallery()
        .await
        .map(Json)
        .map_err(map_api_error("Failed to load gallery"))
}
