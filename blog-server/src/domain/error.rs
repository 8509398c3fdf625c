use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Input the caller can fix and resubmit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("slug '{0}' may only contain lowercase letters, digits and single hyphens")]
    InvalidSlug(String),
    #[error("slug '{0}' is already in use")]
    SlugTaken(String),
    #[error("scheduled time must be in the future")]
    ScheduleNotInFuture,
    #[error("status 'scheduled' requires scheduled_at")]
    MissingScheduleTime,
    #[error("scheduled_at is only accepted together with status 'scheduled'")]
    UnexpectedScheduleTime,
    #[error("a published post must be unpublished before it can be scheduled")]
    ScheduleWhilePublished,
    #[error("comment must be at most {max} characters")]
    CommentTooLong { max: usize },
    #[error("unknown post status '{0}'")]
    UnknownStatus(String),
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("post not found: {0}")]
    PostNotFound(String),
    #[error("author not found: {0}")]
    AuthorNotFound(uuid::Uuid),
    #[error("unauthorized")]
    Unauthorized,
    #[error("store error: {0}")]
    Store(String),
}

impl DomainError {
    pub fn post_not_found(key: impl ToString) -> Self {
        DomainError::PostNotFound(key.to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Validation(_))
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::Validation(ValidationError::SlugTaken(_)) => StatusCode::CONFLICT,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::PostNotFound(_) | DomainError::AuthorNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
            DomainError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // store failures are logged where they are mapped; the caller gets no detail
        let message = match self {
            DomainError::Store(_) => "internal server error".to_string(),
            DomainError::Validation(inner) => inner.to_string(),
            other => other.to_string(),
        };
        let details = match self {
            DomainError::PostNotFound(resource) => Some(json!({ "resource": resource })),
            DomainError::Validation(ValidationError::SlugTaken(slug)) => {
                Some(json!({ "field": "slug", "value": slug }))
            }
            _ => None,
        };
        let body = ErrorBody {
            error: message.as_str(),
            details,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
