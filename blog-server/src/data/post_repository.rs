use crate::domain::error::{DomainError, ValidationError};
use crate::domain::post::{NewPost, Post, PostStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{error, info};

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Inserts a post; the store assigns the id and enforces slug uniqueness.
    async fn create(&self, post: NewPost) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, DomainError>;
    /// Writes every mutable column of `post`; `None` when the row is gone.
    async fn update(&self, post: &Post) -> Result<Option<Post>, DomainError>;
    /// `false` when no row had that id.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
    /// Every post that is not a draft. Callers still apply the visibility rule.
    async fn list_publishable(&self) -> Result<Vec<Post>, DomainError>;
}

const POST_COLUMNS: &str = "id, slug, title, content, excerpt, featured_image, meta_description, \
     tags, author, status, created_at, updated_at, published_at, scheduled_at";

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    slug: String,
    title: String,
    content: String,
    excerpt: Option<String>,
    featured_image: Option<String>,
    meta_description: Option<String>,
    tags: Vec<String>,
    author: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    published_at: Option<DateTime<Utc>>,
    scheduled_at: Option<DateTime<Utc>>,
}

impl TryFrom<PostRow> for Post {
    type Error = DomainError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let status: PostStatus = row.status.parse().map_err(|e: ValidationError| {
            error!(post_id = row.id, "stored post has invalid status: {}", e);
            DomainError::Store(e.to_string())
        })?;
        Ok(Post {
            id: row.id,
            slug: row.slug,
            title: row.title,
            content: row.content,
            excerpt: row.excerpt,
            featured_image: row.featured_image,
            meta_description: row.meta_description,
            tags: row.tags,
            author: row.author,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            published_at: row.published_at,
            scheduled_at: row.scheduled_at,
        })
    }
}

fn map_write_error(e: sqlx::Error, slug: &str) -> DomainError {
    let slug_taken = e
        .as_database_error()
        .and_then(|db| db.constraint())
        .map(|c| c == "posts_slug_key")
        == Some(true);
    if slug_taken {
        return ValidationError::SlugTaken(slug.to_string()).into();
    }
    error!("failed to write post {}: {}", slug, e);
    DomainError::Store(format!("database error: {}", e))
}

fn map_read_error(e: sqlx::Error) -> DomainError {
    error!("db error while reading posts: {}", e);
    DomainError::Store(e.to_string())
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            INSERT INTO posts (slug, title, content, excerpt, featured_image,
                               meta_description, tags, author, status, created_at,
                               updated_at, published_at, scheduled_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10, $11, $12)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(&post.slug)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.excerpt)
        .bind(&post.featured_image)
        .bind(&post.meta_description)
        .bind(&post.tags)
        .bind(&post.author)
        .bind(post.status.as_str())
        .bind(post.created_at)
        .bind(post.published_at)
        .bind(post.scheduled_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &post.slug))?;

        let created = Post::try_from(row)?;
        info!(post_id = created.id, slug = %created.slug, status = %created.status, "post created");
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, PostRow>(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_read_error)?
            .map(Post::try_from)
            .transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, PostRow>(&format!("SELECT {POST_COLUMNS} FROM posts WHERE slug = $1"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_read_error)?
            .map(Post::try_from)
            .transpose()
    }

    async fn update(&self, post: &Post) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE posts
            SET
                slug = $1,
                title = $2,
                content = $3,
                excerpt = $4,
                featured_image = $5,
                meta_description = $6,
                tags = $7,
                status = $8,
                updated_at = $9,
                published_at = $10,
                scheduled_at = $11
            WHERE id = $12
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(&post.slug)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.excerpt)
        .bind(&post.featured_image)
        .bind(&post.meta_description)
        .bind(&post.tags)
        .bind(post.status.as_str())
        .bind(post.updated_at)
        .bind(post.published_at)
        .bind(post.scheduled_at)
        .bind(post.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &post.slug))?;

        let updated = row.map(Post::try_from).transpose()?;
        if let Some(post) = &updated {
            info!(post_id = post.id, status = %post.status, "post updated");
        }
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete post {}: {}", id, e);
                DomainError::Store(e.to_string())
            })?;

        let removed = deleted.rows_affected() > 0;
        if removed {
            info!(post_id = id, "post deleted");
        }
        Ok(removed)
    }

    async fn list_publishable(&self) -> Result<Vec<Post>, DomainError> {
        sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE status <> 'draft'"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_read_error)?
        .into_iter()
        .map(Post::try_from)
        .collect()
    }
}
