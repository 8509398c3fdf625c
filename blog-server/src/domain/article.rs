//! Read model shared by every content source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::post::{Post, PostStatus};

const SNIPPET_CHARS: usize = 160;
const WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Store,
    Static,
}

/// A publicly readable post, whichever source it came from.
///
/// `status` is always `published`: a scheduled post whose time has come is
/// shown as published, and `published_at` carries its scheduled instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub slug: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub snippet: String,
    pub status: PostStatus,
    pub published_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub author: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "readTime")]
    pub read_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip)]
    pub source: Option<ContentSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub snippet: String,
    pub tags: Vec<String>,
    pub author: String,
    #[serde(rename = "readTime", skip_serializing_if = "Option::is_none")]
    pub read_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
}

impl Article {
    /// Projects a store post as readers see it. `None` unless the post is visible at `now`.
    pub fn from_post(post: Post, now: DateTime<Utc>) -> Option<Self> {
        let date = post.effective_publish_at(now)?;
        let snippet = post
            .excerpt
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| snippet_of(&post.content));
        let read_time = read_time_of(&post.content);
        Some(Self {
            id: Some(post.id),
            slug: post.slug,
            title: post.title,
            content: post.content,
            excerpt: post.excerpt,
            snippet,
            status: PostStatus::Published,
            published_at: date,
            created_at: Some(post.created_at),
            updated_at: Some(post.updated_at),
            tags: post.tags,
            author: post.author,
            date,
            read_time,
            featured_image: post.featured_image,
            meta_description: post.meta_description,
            source: Some(ContentSource::Store),
        })
    }

    pub fn summary(&self) -> PostSummary {
        PostSummary {
            slug: self.slug.clone(),
            title: self.title.clone(),
            date: self.date,
            snippet: self.snippet.clone(),
            tags: self.tags.clone(),
            author: self.author.clone(),
            read_time: Some(self.read_time.clone()),
            featured_image: self.featured_image.clone(),
        }
    }
}

/// Newest first; slug breaks ties so listings are stable.
pub fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
}

/// Text of a markup string with tags removed and whitespace collapsed.
pub fn plain_text(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match ch {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn snippet_of(markup: &str) -> String {
    let text = plain_text(markup);
    if text.chars().count() <= SNIPPET_CHARS {
        return text;
    }
    let cut: String = text.chars().take(SNIPPET_CHARS).collect();
    let cut = match cut.rfind(' ') {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}…", cut.trim_end_matches([',', '.', ';', ':']))
}

pub fn read_time_of(markup: &str) -> String {
    let words = plain_text(markup).split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{minutes} min read")
}
