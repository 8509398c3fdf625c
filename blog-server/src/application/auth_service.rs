use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::data::author_repository::AuthorRepository;
use crate::domain::author::{Author, AuthorContext};
use crate::domain::error::DomainError;
use crate::infrastructure::config::AdminBootstrap;
use crate::infrastructure::security::{JwtKeys, hash_password, verify_password};

/// A freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn AuthorRepository>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(repo: Arc<dyn AuthorRepository>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub async fn get_author(&self, id: Uuid) -> Result<Author, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::AuthorNotFound(id))
    }

    /// Resolves a bearer token to the account it was issued for.
    pub async fn authenticate(&self, token: &str) -> Result<AuthorContext, DomainError> {
        let claims = self
            .keys
            .verify_token(token)
            .map_err(|_| DomainError::Unauthorized)?;
        let id = Uuid::parse_str(&claims.sub).map_err(|_| DomainError::Unauthorized)?;
        let author = self.get_author(id).await.map_err(|err| match err {
            DomainError::AuthorNotFound(_) => DomainError::Unauthorized,
            other => other,
        })?;
        Ok(AuthorContext::from(&author))
    }

    /// Unknown email and wrong password fail the same way.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, DomainError> {
        let author = self
            .repo
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let valid = verify_password(password, &author.password_hash)
            .map_err(|_| DomainError::Unauthorized)?;
        if !valid {
            warn!(author_id = %author.id, "rejected login");
            return Err(DomainError::Unauthorized);
        }

        let access_token = self
            .keys
            .generate_token(author.id)
            .map_err(|err| DomainError::Store(err.to_string()))?;
        info!(author_id = %author.id, "author logged in");
        Ok(IssuedToken {
            access_token,
            expires_in: self.keys.ttl_secs(),
        })
    }

    /// Creates the configured admin account unless one with that email exists.
    #[instrument(skip(self, admin), fields(email = %admin.email))]
    pub async fn ensure_admin(&self, admin: &AdminBootstrap) -> Result<Author, DomainError> {
        let email = admin.email.trim().to_lowercase();
        if let Some(existing) = self.repo.find_by_email(&email).await? {
            return Ok(existing);
        }
        let hash =
            hash_password(&admin.password).map_err(|err| DomainError::Store(err.to_string()))?;
        let author = Author::new(email, admin.display_name.clone(), hash);
        self.repo.create_if_absent(author).await
    }
}
