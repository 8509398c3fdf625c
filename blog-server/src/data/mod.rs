pub mod author_repository;
pub mod comment_repository;
pub mod memory;
pub mod post_repository;
pub mod static_articles;
