pub mod memory_content_repository;
pub mod memory_email_repository;
pub mod memory_object_storage_repository;
