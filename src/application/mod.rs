// Application layer - services orchestrating domain models and repositories
pub mod dto;
pub mod errors;
pub mod services;
