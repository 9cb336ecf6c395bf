pub mod content_dto;
pub mod crop_session_dto;
pub mod testimonial_dto;
