use actix_web::{HttpRequest, HttpResponse, get, web};
use tracing::debug;

use crate::application::query_service::ContentQueryService;
use crate::domain::error::DomainError;
use crate::presentation::utils::request_id;

#[get("/posts")]
pub async fn list_posts(
    req: HttpRequest,
    query: web::Data<ContentQueryService>,
) -> Result<HttpResponse, DomainError> {
    let posts = query.list_visible_posts().await?;

    debug!(
        request_id = %request_id(&req),
        count = posts.len(),
        "posts listed"
    );

    Ok(HttpResponse::Ok().json(posts))
}

#[get("/posts/{slug}")]
pub async fn get_post(
    query: web::Data<ContentQueryService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let article = query.get_post_by_slug(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(article))
}
