use crate::domain::author::Author;
use crate::domain::error::DomainError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Inserts the account, or returns the existing one with the same email.
    async fn create_if_absent(&self, author: Author) -> Result<Author, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Author>, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, DomainError>;
}

#[derive(sqlx::FromRow)]
struct AuthorRow {
    id: Uuid,
    email: String,
    display_name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Author {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PostgresAuthorRepository {
    pool: PgPool,
}

impl PostgresAuthorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepository for PostgresAuthorRepository {
    async fn create_if_absent(&self, author: Author) -> Result<Author, DomainError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO authors (id, email, display_name, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT ON CONSTRAINT authors_email_key DO NOTHING
            "#,
        )
        .bind(author.id)
        .bind(&author.email)
        .bind(&author.display_name)
        .bind(&author.password_hash)
        .bind(author.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create author: {}", e);
            DomainError::Store(format!("database error: {}", e))
        })?;

        if inserted.rows_affected() > 0 {
            info!(author_id = %author.id, "author created");
            return Ok(author);
        }
        self.find_by_email(&author.email)
            .await?
            .ok_or_else(|| DomainError::Store("author vanished after conflict".into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Author>, DomainError> {
        sqlx::query_as::<_, AuthorRow>(
            r#"
            SELECT id, email, display_name, password_hash, created_at
            FROM authors
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Author::from))
        .map_err(|e| {
            error!("failed to find author by email: {}", e);
            DomainError::Store(format!("database error: {}", e))
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, DomainError> {
        sqlx::query_as::<_, AuthorRow>(
            r#"
            SELECT id, email, display_name, password_hash, created_at
            FROM authors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Author::from))
        .map_err(|e| {
            error!("failed to find author by id {}: {}", id, e);
            DomainError::Store(format!("database error: {}", e))
        })
    }
}
