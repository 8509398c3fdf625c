use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account allowed to author and manage posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Author {
    pub fn new(email: String, display_name: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            display_name,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Identity of the account behind an authoring request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorContext {
    pub id: Uuid,
    pub display_name: String,
}

impl From<&Author> for AuthorContext {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            display_name: author.display_name.clone(),
        }
    }
}
