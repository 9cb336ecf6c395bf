// Domain layer - models, errors and the interfaces implemented by infrastructure
pub mod errors;
pub mod models;
pub mod repositories;
