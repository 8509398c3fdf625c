use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::comment::Comment;
use crate::domain::post::{PostChanges, PostDraft, PostStatus};

// ======================= AUTH =======================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String, // "Bearer"
}

// ======================= POSTS =======================

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub meta_description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: Option<PostStatus>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl From<CreatePostRequest> for PostDraft {
    fn from(req: CreatePostRequest) -> Self {
        PostDraft {
            slug: req.slug,
            title: req.title,
            content: req.content,
            excerpt: req.excerpt,
            featured_image: req.featured_image,
            meta_description: req.meta_description,
            tags: req.tags,
            status: req.status,
            scheduled_at: req.scheduled_at,
        }
    }
}

/// Absent fields are left as stored; an empty string clears an optional field.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub meta_description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<PostStatus>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl From<UpdatePostRequest> for PostChanges {
    fn from(req: UpdatePostRequest) -> Self {
        PostChanges {
            slug: req.slug,
            title: req.title,
            content: req.content,
            excerpt: req.excerpt,
            featured_image: req.featured_image,
            meta_description: req.meta_description,
            tags: req.tags,
            status: req.status,
            scheduled_at: req.scheduled_at,
        }
    }
}

// ======================= COMMENTS =======================

/// Missing fields are reported by the service as empty, not by the JSON parser.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentResponse {
    pub id: i64,
    pub author_name: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            author_name: comment.author_name,
            comment: comment.body,
            created_at: comment.created_at,
        }
    }
}

// ======================= Utils =======================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}
