//! Client for the tutoring blog API.

mod error;
mod http_client;
mod models;
mod token;

pub use error::BlogClientError;
pub use http_client::BlogClient;
pub use models::{
    Article, AuthResponse, Comment, CreatePost, Post, PostStatus, PostSummary, UpdatePost,
};
pub use token::{DEFAULT_TOKEN_FILE, TokenStore};
