use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Scheduled,
    Published,
}

impl PostStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Scheduled => "scheduled",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "scheduled" => Ok(PostStatus::Scheduled),
            "published" => Ok(PostStatus::Published),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// A requested lifecycle move, carrying the instant a schedule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Draft,
    Publish,
    Schedule(DateTime<Utc>),
}

impl StatusChange {
    /// Pairs a requested status with an optional `scheduled_at`.
    pub fn from_request(
        status: PostStatus,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> Result<Self, ValidationError> {
        match (status, scheduled_at) {
            (PostStatus::Scheduled, Some(at)) => Ok(StatusChange::Schedule(at)),
            (PostStatus::Scheduled, None) => Err(ValidationError::MissingScheduleTime),
            (_, Some(_)) => Err(ValidationError::UnexpectedScheduleTime),
            (PostStatus::Draft, None) => Ok(StatusChange::Draft),
            (PostStatus::Published, None) => Ok(StatusChange::Publish),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub meta_description: Option<String>,
    pub tags: Vec<String>,
    pub author: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl Post {
    /// The one definition of public visibility. A scheduled post whose time has
    /// come is treated as published here without its stored status changing.
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            PostStatus::Published => true,
            PostStatus::Scheduled => self.scheduled_at.is_some_and(|at| at <= now),
            PostStatus::Draft => false,
        }
    }

    /// Instant readers see as the publication date, if the post is visible at `now`.
    pub fn effective_publish_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if !self.is_visible_at(now) {
            return None;
        }
        match self.status {
            PostStatus::Published => Some(self.published_at.unwrap_or(self.updated_at)),
            PostStatus::Scheduled => self.scheduled_at,
            PostStatus::Draft => None,
        }
    }

    /// Applies a lifecycle move and keeps the timestamps consistent with the
    /// resulting status.
    pub fn transition(
        &mut self,
        change: StatusChange,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut lifecycle = Lifecycle {
            status: self.status,
            published_at: self.published_at,
            scheduled_at: self.scheduled_at,
        };
        lifecycle.transition(change, now)?;
        self.status = lifecycle.status;
        self.published_at = lifecycle.published_at;
        self.scheduled_at = lifecycle.scheduled_at;
        Ok(())
    }
}

/// Status plus the two timestamps whose presence depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl Lifecycle {
    pub const fn draft() -> Self {
        Self {
            status: PostStatus::Draft,
            published_at: None,
            scheduled_at: None,
        }
    }

    /// Moves to the requested state. On error nothing changes.
    pub fn transition(
        &mut self,
        change: StatusChange,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        match change {
            StatusChange::Draft => {
                self.status = PostStatus::Draft;
                self.published_at = None;
                self.scheduled_at = None;
            }
            StatusChange::Publish => {
                if self.status != PostStatus::Published || self.published_at.is_none() {
                    self.published_at = Some(now);
                }
                self.status = PostStatus::Published;
                self.scheduled_at = None;
            }
            StatusChange::Schedule(at) => {
                if self.status == PostStatus::Published {
                    return Err(ValidationError::ScheduleWhilePublished.into());
                }
                if at <= now {
                    return Err(ValidationError::ScheduleNotInFuture.into());
                }
                self.status = PostStatus::Scheduled;
                self.scheduled_at = Some(at);
                self.published_at = None;
            }
        }
        Ok(())
    }
}

/// Validated input for a post that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub meta_description: Option<String>,
    pub tags: Vec<String>,
    pub author: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl NewPost {
    pub fn into_post(self, id: i64) -> Post {
        Post {
            id,
            slug: self.slug,
            title: self.title,
            content: self.content,
            excerpt: self.excerpt,
            featured_image: self.featured_image,
            meta_description: self.meta_description,
            tags: self.tags,
            author: self.author,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.created_at,
            published_at: self.published_at,
            scheduled_at: self.scheduled_at,
        }
    }
}

/// Authoring fields for a create request, before validation.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub meta_description: Option<String>,
    pub tags: Vec<String>,
    pub status: Option<PostStatus>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
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

impl PostChanges {
    pub fn status_change(
        &self,
        current: PostStatus,
    ) -> Result<Option<StatusChange>, ValidationError> {
        match (self.status, self.scheduled_at) {
            (Some(status), at) => StatusChange::from_request(status, at).map(Some),
            // moving the date of an already scheduled post
            (None, Some(at)) if current == PostStatus::Scheduled => {
                Ok(Some(StatusChange::Schedule(at)))
            }
            (None, Some(_)) => Err(ValidationError::UnexpectedScheduleTime),
            (None, None) => Ok(None),
        }
    }
}

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Err(ValidationError::EmptyField("slug"));
    }
    let well_formed = slug.split('-').all(|part| {
        !part.is_empty()
            && part
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    });
    if !well_formed {
        return Err(ValidationError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

pub fn require_non_empty(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// Trims tags, drops blanks and repeats, keeps author order.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
