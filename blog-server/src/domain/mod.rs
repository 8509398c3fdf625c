pub mod article;
pub mod author;
pub mod comment;
pub mod error;
pub mod post;
