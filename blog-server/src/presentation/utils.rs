use actix_web::dev::Payload;
use actix_web::error::JsonPayloadError;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, HttpResponse, error::InternalError};
use futures_util::future::{Ready, ready};
use serde_json::json;

use crate::domain::author::AuthorContext;
use crate::domain::error::DomainError;
use crate::presentation::middleware::RequestId;

/// Available on routes behind `JwtAuthMiddleware`; anywhere else it fails with 401.
impl FromRequest for AuthorContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthorContext>() {
            Some(author) => ready(Ok(author.clone())),
            None => ready(Err(DomainError::Unauthorized.into())),
        }
    }
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}

/// Malformed JSON bodies get the same `{error}` shape as domain errors.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    let response = HttpResponse::BadRequest().json(json!({ "error": err.to_string() }));
    InternalError::from_response(err, response).into()
}
