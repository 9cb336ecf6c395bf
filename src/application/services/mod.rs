pub mod contact_service;
pub mod content_service;
pub mod crop_queue_controller;
pub mod crop_session_service;
pub mod testimonial_form;
pub mod testimonial_service;
