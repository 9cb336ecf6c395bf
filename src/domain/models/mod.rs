pub mod contact_message;
pub mod content;
pub mod crop;
pub mod crop_queue;
pub mod crop_tool;
pub mod drawing;
pub mod gallery;
pub mod selected_file;
pub mod storage;
pub mod testimonial;
