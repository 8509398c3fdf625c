pub mod auth_service;
pub mod content_provider;
pub mod mutation_service;
pub mod query_service;
