pub mod content_repository;
pub mod email_repository;
pub mod object_storage_repository;
