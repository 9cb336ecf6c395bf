// Presentation layer - HTTP API over the application services
pub mod errors;
pub mod routes;
