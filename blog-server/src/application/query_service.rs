use std::sync::Arc;

use tracing::instrument;

use crate::application::content_provider::ContentProvider;
use crate::data::comment_repository::CommentRepository;
use crate::domain::article::{Article, PostSummary};
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;

/// Public read side: visible posts and their comments.
#[derive(Clone)]
pub struct ContentQueryService {
    content: Arc<dyn ContentProvider>,
    comments: Arc<dyn CommentRepository>,
}

impl ContentQueryService {
    pub fn new(content: Arc<dyn ContentProvider>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { content, comments }
    }

    #[instrument(skip(self))]
    pub async fn list_visible_posts(&self) -> Result<Vec<PostSummary>, DomainError> {
        let articles = self.content.list_visible().await?;
        Ok(articles.iter().map(Article::summary).collect())
    }

    /// Drafts and not-yet-due posts are reported as missing, never as hidden.
    #[instrument(skip(self))]
    pub async fn get_post_by_slug(&self, slug: &str) -> Result<Article, DomainError> {
        self.content
            .find_visible(slug)
            .await?
            .ok_or_else(|| DomainError::post_not_found(slug))
    }

    /// Comments need no matching post row.
    #[instrument(skip(self))]
    pub async fn list_comments_by_slug(&self, slug: &str) -> Result<Vec<Comment>, DomainError> {
        self.comments.list_by_slug(slug).await
    }
}
