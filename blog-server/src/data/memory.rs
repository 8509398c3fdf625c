//! In-memory repositories, used when no database is configured and by tests.
//! Data is lost on restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::data::author_repository::AuthorRepository;
use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::author::Author;
use crate::domain::comment::{Comment, NewComment};
use crate::domain::error::{DomainError, ValidationError};
use crate::domain::post::{NewPost, Post, PostStatus};

#[derive(Default)]
struct PostTable {
    last_id: i64,
    rows: BTreeMap<i64, Post>,
}

impl PostTable {
    fn slug_owner(&self, slug: &str) -> Option<i64> {
        self.rows.values().find(|p| p.slug == slug).map(|p| p.id)
    }
}

#[derive(Default)]
pub struct InMemoryPostRepository {
    table: RwLock<PostTable>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        // uniqueness check and insert happen under one write lock
        let mut table = self.table.write().await;
        if table.slug_owner(&post.slug).is_some() {
            return Err(ValidationError::SlugTaken(post.slug).into());
        }
        table.last_id += 1;
        let post = post.into_post(table.last_id);
        table.rows.insert(post.id, post.clone());
        info!(post_id = post.id, slug = %post.slug, status = %post.status, "post created");
        Ok(post)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, DomainError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|p| p.slug == slug).cloned())
    }

    async fn update(&self, post: &Post) -> Result<Option<Post>, DomainError> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&post.id) {
            return Ok(None);
        }
        if table.slug_owner(&post.slug).is_some_and(|owner| owner != post.id) {
            return Err(ValidationError::SlugTaken(post.slug.clone()).into());
        }
        let Some(stored) = table.rows.get_mut(&post.id) else {
            return Ok(None);
        };
        // created_at and author are fixed at creation
        *stored = Post {
            created_at: stored.created_at,
            author: stored.author.clone(),
            ..post.clone()
        };
        info!(post_id = post.id, status = %post.status, "post updated");
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let removed = self.table.write().await.rows.remove(&id).is_some();
        if removed {
            info!(post_id = id, "post deleted");
        }
        Ok(removed)
    }

    async fn list_publishable(&self) -> Result<Vec<Post>, DomainError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|p| p.status != PostStatus::Draft)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct CommentTable {
    last_id: i64,
    rows: Vec<Comment>,
}

#[derive(Default)]
pub struct InMemoryCommentRepository {
    table: RwLock<CommentTable>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, DomainError> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let comment = comment.into_comment(table.last_id);
        table.rows.push(comment.clone());
        info!(comment_id = comment.id, slug = %comment.post_slug, "comment created");
        Ok(comment)
    }

    async fn list_by_slug(&self, slug: &str) -> Result<Vec<Comment>, DomainError> {
        let table = self.table.read().await;
        let mut comments: Vec<Comment> = table
            .rows
            .iter()
            .filter(|c| c.post_slug == slug)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(comments)
    }
}

#[derive(Default)]
pub struct InMemoryAuthorRepository {
    rows: RwLock<Vec<Author>>,
}

impl InMemoryAuthorRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthorRepository for InMemoryAuthorRepository {
    async fn create_if_absent(&self, author: Author) -> Result<Author, DomainError> {
        let mut rows = self.rows.write().await;
        if let Some(existing) = rows.iter().find(|a| a.email == author.email) {
            return Ok(existing.clone());
        }
        rows.push(author.clone());
        info!(author_id = %author.id, "author created");
        Ok(author)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Author>, DomainError> {
        Ok(self.rows.read().await.iter().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, DomainError> {
        Ok(self.rows.read().await.iter().find(|a| a.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn new_post(slug: &str) -> NewPost {
        NewPost {
            slug: slug.into(),
            title: "Title".into(),
            content: String::new(),
            excerpt: None,
            featured_image: None,
            meta_description: None,
            tags: vec![],
            author: "Staff".into(),
            status: PostStatus::Draft,
            created_at: Utc::now(),
            published_at: None,
            scheduled_at: None,
        }
    }

    #[tokio::test]
    async fn assigns_increasing_ids() {
        let repo = InMemoryPostRepository::new();
        let a = repo.create(new_post("a")).await.unwrap();
        let b = repo.create(new_post("b")).await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected_on_create_and_update() {
        let repo = InMemoryPostRepository::new();
        repo.create(new_post("taken")).await.unwrap();
        let err = repo.create(new_post("taken")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(ValidationError::SlugTaken(_))));

        let mut other = repo.create(new_post("other")).await.unwrap();
        other.slug = "taken".into();
        let err = repo.update(&other).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(ValidationError::SlugTaken(_))));
    }

    #[tokio::test]
    async fn concurrent_creates_with_same_slug_admit_one() {
        let repo = std::sync::Arc::new(InMemoryPostRepository::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create(new_post("race")).await })
            })
            .collect();

        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
    }

    #[tokio::test]
    async fn update_of_missing_post_returns_none() {
        let repo = InMemoryPostRepository::new();
        let post = new_post("ghost").into_post(99);
        assert!(repo.update(&post).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn comments_list_newest_first_with_id_tiebreak() {
        let repo = InMemoryCommentRepository::new();
        let t1 = Utc::now();
        let t2 = t1 + Duration::seconds(5);
        let c1 = repo
            .create(NewComment::new("s", "A", "first", t1).unwrap())
            .await
            .unwrap();
        let c2 = repo
            .create(NewComment::new("s", "B", "second", t2).unwrap())
            .await
            .unwrap();
        let c3 = repo
            .create(NewComment::new("s", "C", "same instant", t2).unwrap())
            .await
            .unwrap();
        repo.create(NewComment::new("elsewhere", "D", "x", t2).unwrap())
            .await
            .unwrap();

        let ids: Vec<i64> = repo
            .list_by_slug("s")
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![c3.id, c2.id, c1.id]);
    }

    #[tokio::test]
    async fn author_creation_is_idempotent_per_email() {
        let repo = InMemoryAuthorRepository::new();
        let first = repo
            .create_if_absent(Author::new("ed@example.com".into(), "Ed".into(), "h".into()))
            .await
            .unwrap();
        let second = repo
            .create_if_absent(Author::new("ed@example.com".into(), "Other".into(), "h2".into()))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.display_name, "Ed");
    }
}
