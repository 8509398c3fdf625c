use actix_web::{HttpResponse, Responder, Scope, post, web};

use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{AuthResponse, LoginRequest};

pub fn scope() -> Scope {
    web::scope("/auth").service(login)
}

#[post("/login")]
async fn login(
    service: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, DomainError> {
    let issued = service.login(&payload.email, &payload.password).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: issued.access_token,
        expires_in: issued.expires_in,
        token_type: "Bearer".to_string(),
    }))
}
