use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::data::post_repository::PostRepository;
use crate::data::static_articles::{self, StaticArticle};
use crate::domain::article::{Article, sort_newest_first};
use crate::domain::error::DomainError;
use crate::infrastructure::clock::Clock;
use crate::infrastructure::config::ContentSourceKind;

/// A source of publicly readable posts.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Every visible article, newest first.
    async fn list_visible(&self) -> Result<Vec<Article>, DomainError>;
    /// The article at `slug`, if it exists and is visible right now.
    async fn find_visible(&self, slug: &str) -> Result<Option<Article>, DomainError>;
}

/// Posts from the content store, filtered by the visibility rule at call time.
pub struct StoreContentProvider {
    posts: Arc<dyn PostRepository>,
    clock: Arc<dyn Clock>,
}

impl StoreContentProvider {
    pub fn new(posts: Arc<dyn PostRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { posts, clock }
    }
}

#[async_trait]
impl ContentProvider for StoreContentProvider {
    async fn list_visible(&self) -> Result<Vec<Article>, DomainError> {
        let now = self.clock.now();
        let mut articles: Vec<Article> = self
            .posts
            .list_publishable()
            .await?
            .into_iter()
            .filter_map(|post| Article::from_post(post, now))
            .collect();
        sort_newest_first(&mut articles);
        Ok(articles)
    }

    async fn find_visible(&self, slug: &str) -> Result<Option<Article>, DomainError> {
        let now = self.clock.now();
        Ok(self
            .posts
            .find_by_slug(slug)
            .await?
            .and_then(|post| Article::from_post(post, now)))
    }
}

/// The articles bundled into the binary.
pub struct StaticContentProvider {
    articles: &'static [StaticArticle],
}

impl StaticContentProvider {
    pub fn new() -> Self {
        Self {
            articles: static_articles::ARTICLES,
        }
    }

    pub fn with_articles(articles: &'static [StaticArticle]) -> Self {
        Self { articles }
    }
}

impl Default for StaticContentProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentProvider for StaticContentProvider {
    async fn list_visible(&self) -> Result<Vec<Article>, DomainError> {
        let mut articles: Vec<Article> = self
            .articles
            .iter()
            .filter_map(StaticArticle::to_article)
            .collect();
        sort_newest_first(&mut articles);
        Ok(articles)
    }

    async fn find_visible(&self, slug: &str) -> Result<Option<Article>, DomainError> {
        Ok(self
            .articles
            .iter()
            .find(|a| a.slug == slug)
            .and_then(StaticArticle::to_article))
    }
}

/// Store first; the fallback fills in slugs the primary does not serve.
pub struct LayeredContentProvider {
    primary: Arc<dyn ContentProvider>,
    fallback: Arc<dyn ContentProvider>,
}

impl LayeredContentProvider {
    pub fn new(primary: Arc<dyn ContentProvider>, fallback: Arc<dyn ContentProvider>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl ContentProvider for LayeredContentProvider {
    async fn list_visible(&self) -> Result<Vec<Article>, DomainError> {
        let mut articles = self.primary.list_visible().await?;
        let served: HashSet<String> = articles.iter().map(|a| a.slug.clone()).collect();
        articles.extend(
            self.fallback
                .list_visible()
                .await?
                .into_iter()
                .filter(|a| !served.contains(&a.slug)),
        );
        sort_newest_first(&mut articles);
        Ok(articles)
    }

    async fn find_visible(&self, slug: &str) -> Result<Option<Article>, DomainError> {
        match self.primary.find_visible(slug).await? {
            Some(article) => Ok(Some(article)),
            None => self.fallback.find_visible(slug).await,
        }
    }
}

/// Builds the provider named by configuration.
pub fn build_provider(
    kind: ContentSourceKind,
    posts: Arc<dyn PostRepository>,
    clock: Arc<dyn Clock>,
) -> Arc<dyn ContentProvider> {
    match kind {
        ContentSourceKind::Store => Arc::new(StoreContentProvider::new(posts, clock)),
        ContentSourceKind::Static => Arc::new(StaticContentProvider::new()),
        ContentSourceKind::Layered => Arc::new(LayeredContentProvider::new(
            Arc::new(StoreContentProvider::new(posts, clock)),
            Arc::new(StaticContentProvider::new()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryPostRepository;
    use crate::domain::article::ContentSource;
    use crate::domain::post::{NewPost, PostStatus};
    use crate::infrastructure::clock::ManualClock;
    use chrono::{DateTime, Duration, Utc};

    static FIXTURE: &[StaticArticle] = &[
        StaticArticle {
            slug: "shared-slug",
            title: "Static Shared",
            author: "Staff",
            date: "2025-01-01",
            read_time: "2 min read",
            tags: &["LSAT"],
            body: "<p>static</p>",
        },
        StaticArticle {
            slug: "static-only",
            title: "Static Only",
            author: "Staff",
            date: "2025-02-01",
            read_time: "2 min read",
            tags: &["LSAT"],
            body: "<p>static</p>",
        },
    ];

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-05-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn new_post(slug: &str, status: PostStatus, at: DateTime<Utc>) -> NewPost {
        NewPost {
            slug: slug.into(),
            title: slug.into(),
            content: "<p>store</p>".into(),
            excerpt: None,
            featured_image: None,
            meta_description: None,
            tags: vec![],
            author: "Editor".into(),
            status,
            created_at: t0(),
            published_at: (status == PostStatus::Published).then_some(at),
            scheduled_at: (status == PostStatus::Scheduled).then_some(at),
        }
    }

    async fn seeded() -> (Arc<InMemoryPostRepository>, Arc<ManualClock>) {
        let repo = Arc::new(InMemoryPostRepository::new());
        repo.create(new_post("shared-slug", PostStatus::Published, t0() - Duration::days(1)))
            .await
            .unwrap();
        repo.create(new_post("draft-post", PostStatus::Draft, t0()))
            .await
            .unwrap();
        repo.create(new_post("later", PostStatus::Scheduled, t0() + Duration::hours(1)))
            .await
            .unwrap();
        (repo, Arc::new(ManualClock::new(t0())))
    }

    #[tokio::test]
    async fn store_provider_hides_drafts_and_future_schedules() {
        let (repo, clock) = seeded().await;
        let provider = StoreContentProvider::new(repo, clock.clone());

        let slugs: Vec<String> = provider
            .list_visible()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.slug)
            .collect();
        assert_eq!(slugs, vec!["shared-slug"]);
        assert!(provider.find_visible("draft-post").await.unwrap().is_none());
        assert!(provider.find_visible("later").await.unwrap().is_none());

        clock.advance(Duration::hours(1));
        let slugs: Vec<String> = provider
            .list_visible()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.slug)
            .collect();
        assert_eq!(slugs, vec!["later", "shared-slug"]);
        assert!(provider.find_visible("later").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn layered_provider_prefers_store_and_fills_from_static() {
        let (repo, clock) = seeded().await;
        let provider = LayeredContentProvider::new(
            Arc::new(StoreContentProvider::new(repo, clock)),
            Arc::new(StaticContentProvider::with_articles(FIXTURE)),
        );

        let listed = provider.list_visible().await.unwrap();
        let slugs: Vec<&str> = listed.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, vec!["shared-slug", "static-only"]);
        assert_eq!(listed[0].source, Some(ContentSource::Store));

        let fallback = provider.find_visible("static-only").await.unwrap().unwrap();
        assert_eq!(fallback.source, Some(ContentSource::Static));
        assert!(provider.find_visible("draft-post").await.unwrap().is_none());
    }

    fn status_from(index: u8) -> PostStatus {
        match index % 3 {
            0 => PostStatus::Draft,
            1 => PostStatus::Scheduled,
            _ => PostStatus::Published,
        }
    }

    proptest::proptest! {
        #[test]
        fn store_listing_matches_visibility_rule(
            rows in proptest::collection::vec((0u8..3, -180i64..180), 0..12),
            elapsed in 0i64..240,
        ) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let (listed, expected) = rt.block_on(async {
                let repo = Arc::new(InMemoryPostRepository::new());
                let mut created = Vec::new();
                for (i, (status, offset)) in rows.iter().enumerate() {
                    let at = t0() + Duration::minutes(*offset);
                    let post = new_post(&format!("post-{i}"), status_from(*status), at);
                    created.push(repo.create(post).await.unwrap());
                }
                let clock = Arc::new(ManualClock::new(t0()));
                clock.advance(Duration::minutes(elapsed));
                let now = clock.now();
                let provider = StoreContentProvider::new(repo, clock);

                let listed: HashSet<String> = provider
                    .list_visible()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|a| a.slug)
                    .collect();
                let expected: HashSet<String> = created
                    .into_iter()
                    .filter(|p| p.is_visible_at(now))
                    .map(|p| p.slug)
                    .collect();
                (listed, expected)
            });
            proptest::prop_assert_eq!(listed, expected);
        }
    }

    #[tokio::test]
    async fn static_provider_lists_newest_first() {
        let provider = StaticContentProvider::with_articles(FIXTURE);
        let listed = provider.list_visible().await.unwrap();

        assert_eq!(listed[0].slug, "static-only");
        assert_eq!(listed[0].id, None);
        assert_eq!(listed[0].read_time, "2 min read");
    }
}
