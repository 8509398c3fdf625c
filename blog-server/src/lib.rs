//! Content pipeline and comment API for the tutoring blog.
//!
//! Public readers see posts that are published, or scheduled with a time that
//! has passed; authors manage posts behind a bearer token; anyone may comment
//! on any slug.

pub mod application;
pub mod data;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod server;
