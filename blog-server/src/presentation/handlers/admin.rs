use actix_web::{HttpRequest, HttpResponse, delete, post, put, web};
use tracing::info;

use crate::application::mutation_service::ContentMutationService;
use crate::domain::author::AuthorContext;
use crate::domain::error::DomainError;
use crate::presentation::dto::{CreatePostRequest, UpdatePostRequest};
use crate::presentation::utils::request_id;

/// Authoring routes. The caller wraps this scope in `JwtAuthMiddleware`.
pub fn scope() -> actix_web::Scope {
    web::scope("/admin")
        .service(create_post)
        .service(update_post)
        .service(delete_post)
}

#[post("/posts")]
async fn create_post(
    req: HttpRequest,
    author: AuthorContext,
    mutations: web::Data<ContentMutationService>,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let post = mutations
        .create_post(&author, payload.into_inner().into())
        .await?;

    info!(
        request_id = %request_id(&req),
        author = %author.display_name,
        post_id = post.id,
        status = %post.status,
        "post created"
    );

    Ok(HttpResponse::Created().json(post))
}

#[put("/posts/{id}")]
async fn update_post(
    req: HttpRequest,
    author: AuthorContext,
    mutations: web::Data<ContentMutationService>,
    path: web::Path<i64>,
    payload: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let post = mutations
        .update_post(&author, post_id, payload.into_inner().into())
        .await?;

    info!(
        request_id = %request_id(&req),
        author = %author.display_name,
        post_id,
        "post updated"
    );

    Ok(HttpResponse::Ok().json(post))
}

#[delete("/posts/{id}")]
async fn delete_post(
    req: HttpRequest,
    author: AuthorContext,
    mutations: web::Data<ContentMutationService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    mutations.delete_post(&author, post_id).await?;

    info!(
        request_id = %request_id(&req),
        author = %author.display_name,
        post_id,
        "post deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
