use actix_web::{HttpRequest, HttpResponse, get, post, web};
use tracing::info;

use crate::application::mutation_service::ContentMutationService;
use crate::application::query_service::ContentQueryService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{CommentResponse, CreateCommentRequest};
use crate::presentation::utils::request_id;

#[get("/posts/{slug}/comments")]
pub async fn list_comments(
    query: web::Data<ContentQueryService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let comments: Vec<CommentResponse> = query
        .list_comments_by_slug(&path.into_inner())
        .await?
        .into_iter()
        .map(CommentResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(comments))
}

#[post("/posts/{slug}/comments")]
pub async fn create_comment(
    req: HttpRequest,
    mutations: web::Data<ContentMutationService>,
    path: web::Path<String>,
    payload: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, DomainError> {
    let slug = path.into_inner();
    let comment = mutations
        .create_comment(&slug, &payload.author_name, &payload.comment)
        .await?;

    info!(
        request_id = %request_id(&req),
        slug = %slug,
        comment_id = comment.id,
        "comment added"
    );

    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}
