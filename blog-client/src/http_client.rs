use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::BlogClientError;
use crate::models::{Article, AuthResponse, Comment, CreatePost, Post, PostSummary, UpdatePost};
use crate::token::TokenStore;

/// HTTP client for the public and authoring endpoints.
#[derive(Clone)]
pub struct BlogClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    store: Option<TokenStore>,
}

impl BlogClient {
    pub fn new(endpoint: &str) -> Result<Self, BlogClientError> {
        let base_url = Url::parse(endpoint.trim_end_matches('/'))
            .map_err(|e| BlogClientError::InvalidRequest(format!("bad server url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BlogClientError::InvalidRequest(format!(
                "bad server url: {endpoint}"
            )));
        }
        Ok(Self {
            client: Client::builder().build()?,
            base_url,
            token: None,
            store: None,
        })
    }

    /// Loads any saved token and persists the next one obtained by `login`.
    pub fn with_token_store(mut self, store: TokenStore) -> Result<Self, BlogClientError> {
        self.token = store.load()?;
        self.store = Some(store);
        Ok(self)
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, BlogClientError> {
        let resp = self
            .client
            .post(self.url(&["auth", "login"]))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let auth: AuthResponse = read_json(resp).await?;

        if let Some(store) = &self.store {
            store.save(&auth.access_token)?;
            debug!(path = %store.path().display(), "token saved");
        }
        self.token = Some(auth.access_token.clone());
        Ok(auth)
    }

    pub async fn list_posts(&self) -> Result<Vec<PostSummary>, BlogClientError> {
        let resp = self.client.get(self.url(&["posts"])).send().await?;
        read_json(resp).await
    }

    pub async fn get_post(&self, slug: &str) -> Result<Article, BlogClientError> {
        let resp = self.client.get(self.url(&["posts", slug])).send().await?;
        read_json(resp).await
    }

    pub async fn list_comments(&self, slug: &str) -> Result<Vec<Comment>, BlogClientError> {
        let resp = self
            .client
            .get(self.url(&["posts", slug, "comments"]))
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn add_comment(
        &self,
        slug: &str,
        author_name: &str,
        comment: &str,
    ) -> Result<Comment, BlogClientError> {
        let resp = self
            .client
            .post(self.url(&["posts", slug, "comments"]))
            .json(&serde_json::json!({ "author_name": author_name, "comment": comment }))
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn create_post(&self, post: &CreatePost) -> Result<Post, BlogClientError> {
        let req = self.client.post(self.url(&["admin", "posts"])).json(post);
        let resp = self.authorized(req)?.send().await?;
        read_json(resp).await
    }

    pub async fn update_post(
        &self,
        id: i64,
        changes: &UpdatePost,
    ) -> Result<Post, BlogClientError> {
        let id = id.to_string();
        let req = self
            .client
            .put(self.url(&["admin", "posts", &id]))
            .json(changes);
        let resp = self.authorized(req)?.send().await?;
        read_json(resp).await
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), BlogClientError> {
        let id = id.to_string();
        let req = self.client.delete(self.url(&["admin", "posts", &id]));
        let resp = self.authorized(req)?.send().await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(BlogClientError::from_http_response(resp).await)
        }
    }

    /// Appends percent-encoded path segments to the base url.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorized(&self, req: RequestBuilder) -> Result<RequestBuilder, BlogClientError> {
        let token = self.token.as_deref().ok_or(BlogClientError::Unauthorized)?;
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| BlogClientError::Unauthorized)?;
        Ok(req.header(AUTHORIZATION, value))
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, BlogClientError> {
    if resp.status().is_success() {
        Ok(resp.json().await?)
    } else {
        Err(BlogClientError::from_http_response(resp).await)
    }
}
