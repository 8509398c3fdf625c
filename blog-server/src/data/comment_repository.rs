use crate::domain::comment::{Comment, NewComment};
use crate::domain::error::DomainError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{error, info};

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: NewComment) -> Result<Comment, DomainError>;
    /// Newest first; ids break ties between comments created in the same instant.
    async fn list_by_slug(&self, slug: &str) -> Result<Vec<Comment>, DomainError>;
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    post_slug: String,
    author_name: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            post_slug: row.post_slug,
            author_name: row.author_name,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (post_slug, author_name, body, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, post_slug, author_name, body, created_at
            "#,
        )
        .bind(&comment.post_slug)
        .bind(&comment.author_name)
        .bind(&comment.body)
        .bind(comment.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create comment on {}: {}", comment.post_slug, e);
            DomainError::Store(format!("database error: {}", e))
        })?;

        info!(comment_id = row.id, slug = %row.post_slug, "comment created");
        Ok(row.into())
    }

    async fn list_by_slug(&self, slug: &str) -> Result<Vec<Comment>, DomainError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_slug, author_name, body, created_at
            FROM comments
            WHERE post_slug = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(slug)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching comments for {}: {}", slug, e);
            DomainError::Store(e.to_string())
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
