use std::sync::Arc;

use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::author::AuthorContext;
use crate::domain::comment::{Comment, NewComment};
use crate::domain::error::{DomainError, ValidationError};
use crate::domain::post::{
    Lifecycle, NewPost, Post, PostChanges, PostDraft, PostStatus, StatusChange, normalize_tags,
    require_non_empty, validate_slug,
};
use crate::infrastructure::clock::Clock;
use tracing::{info, instrument};

/// Write side: authoring operations on posts, and public comment submission.
#[derive(Clone)]
pub struct ContentMutationService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    clock: Arc<dyn Clock>,
}

impl ContentMutationService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            posts,
            comments,
            clock,
        }
    }

    #[instrument(skip(self, draft), fields(author_id = %author.id, slug = %draft.slug))]
    pub async fn create_post(
        &self,
        author: &AuthorContext,
        draft: PostDraft,
    ) -> Result<Post, DomainError> {
        let now = self.clock.now();
        let title = require_non_empty("title", &draft.title)?;
        let slug = draft.slug.trim().to_string();
        validate_slug(&slug)?;

        let change = StatusChange::from_request(
            draft.status.unwrap_or(PostStatus::Draft),
            draft.scheduled_at,
        )?;
        let mut lifecycle = Lifecycle::draft();
        lifecycle.transition(change, now)?;

        if self.posts.find_by_slug(&slug).await?.is_some() {
            return Err(ValidationError::SlugTaken(slug).into());
        }

        let post = NewPost {
            slug,
            title,
            content: draft.content,
            excerpt: optional_text(draft.excerpt),
            featured_image: optional_text(draft.featured_image),
            meta_description: optional_text(draft.meta_description),
            tags: normalize_tags(draft.tags),
            author: author.display_name.clone(),
            status: lifecycle.status,
            created_at: now,
            published_at: lifecycle.published_at,
            scheduled_at: lifecycle.scheduled_at,
        };
        // the store's unique constraint settles races the check above cannot see
        self.posts.create(post).await
    }

    #[instrument(skip(self, changes), fields(author_id = %author.id))]
    pub async fn update_post(
        &self,
        author: &AuthorContext,
        id: i64,
        changes: PostChanges,
    ) -> Result<Post, DomainError> {
        let now = self.clock.now();
        let mut post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))?;
        let status_change = changes.status_change(post.status)?;

        if let Some(title) = changes.title {
            post.title = require_non_empty("title", &title)?;
        }
        if let Some(slug) = changes.slug {
            let slug = slug.trim().to_string();
            validate_slug(&slug)?;
            if slug != post.slug {
                let owner = self.posts.find_by_slug(&slug).await?;
                if owner.is_some_and(|other| other.id != post.id) {
                    return Err(ValidationError::SlugTaken(slug).into());
                }
                post.slug = slug;
            }
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(excerpt) = changes.excerpt {
            post.excerpt = optional_text(Some(excerpt));
        }
        if let Some(image) = changes.featured_image {
            post.featured_image = optional_text(Some(image));
        }
        if let Some(meta) = changes.meta_description {
            post.meta_description = optional_text(Some(meta));
        }
        if let Some(tags) = changes.tags {
            post.tags = normalize_tags(tags);
        }
        if let Some(change) = status_change {
            let before = post.status;
            post.transition(change, now)?;
            info!(post_id = id, from = %before, to = %post.status, "post status changed");
        }
        post.updated_at = now;

        self.posts
            .update(&post)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// Comments on the post's slug are left in place.
    #[instrument(skip(self), fields(author_id = %author.id))]
    pub async fn delete_post(&self, author: &AuthorContext, id: i64) -> Result<(), DomainError> {
        if self.posts.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::post_not_found(id))
        }
    }

    /// Public; the slug does not have to name a stored post.
    #[instrument(skip(self, author_name, body))]
    pub async fn create_comment(
        &self,
        slug: &str,
        author_name: &str,
        body: &str,
    ) -> Result<Comment, DomainError> {
        let comment = NewComment::new(slug, author_name, body, self.clock.now())?;
        self.comments.create(comment).await
    }
}

/// Trimmed text, with blank meaning absent.
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
