use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};

use crate::app::AppState;

pub mod contact_routes;
pub mod content_routes;
pub mod crop_session_routes;
pub mod helpers;
pub mod storage_routes;
pub mod testimonial_routes;


/// Every route of the site API
pub fn router(app_state: Arc<AppState>) -> Router {
    let body_limit = app_state.config.server.max_body_bytes;

    Router::new()
        .route("/api/landing", get(content_routes::get_landing_page))
        .route("/api/artworks", get(content_routes::get_artworks))
        .route("/api/classes", get(content_routes::get_classes))
        .route("/api/contact-info", get(content_routes::get_contact_info))
        .route("/api/gallery", get(content_routes::get_gallery))
        .route(
            "/api/testimonials",
            get(testimonial_routes::get_testimonials).post(testimonial_routes::submit_testimonial),
        )
        .route("/api/crop-sessions", post(crop_session_routes::start_crop_session))
        .route("/api/crop-sessions/:id", get(crop_session_routes::get_crop_session))
        .route("/api/crop-sessions/:id/confirm", post(crop_session_routes::confirm_crop))
        .route("/api/crop-sessions/:id/cancel", post(crop_session_routes::cancel_crop))
        .route(
            "/api/crop-sessions/:id/titles/:index",
            put(crop_session_routes::set_drawing_title),
        )
        .route("/api/contact", post(contact_routes::send_contact_message))
        .route("/storage/*path", get(storage_routes::get_object))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(app_state)
}
