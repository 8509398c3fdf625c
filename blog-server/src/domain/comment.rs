use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::ValidationError;
use crate::domain::post::require_non_empty;

pub const MAX_COMMENT_CHARS: usize = 2000;

/// A reader comment. Keyed by slug only, so it may belong to a store post,
/// a bundled article, or nothing at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_slug: String,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post_slug: String,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl NewComment {
    pub fn new(
        slug: &str,
        author_name: &str,
        body: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        // the slug is a lookup key and is stored exactly as given
        if slug.trim().is_empty() {
            return Err(ValidationError::EmptyField("slug"));
        }
        let post_slug = slug.to_string();
        let author_name = require_non_empty("author_name", author_name)?;
        let body = require_non_empty("comment", body)?;
        if body.chars().count() > MAX_COMMENT_CHARS {
            return Err(ValidationError::CommentTooLong {
                max: MAX_COMMENT_CHARS,
            });
        }
        Ok(Self {
            post_slug,
            author_name,
            body,
            created_at,
        })
    }

    pub fn into_comment(self, id: i64) -> Comment {
        Comment {
            id,
            post_slug: self.post_slug,
            author_name: self.author_name,
            body: self.body,
            created_at: self.created_at,
        }
    }
}
