pub mod admin;
pub mod auth;
pub mod comments;
pub mod posts;
