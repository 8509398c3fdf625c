use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;

use crate::application::auth_service::AuthService;
use crate::application::content_provider::build_provider;
use crate::application::mutation_service::ContentMutationService;
use crate::application::query_service::ContentQueryService;
use crate::data::author_repository::{AuthorRepository, PostgresAuthorRepository};
use crate::data::comment_repository::{CommentRepository, PostgresCommentRepository};
use crate::data::memory::{
    InMemoryAuthorRepository, InMemoryCommentRepository, InMemoryPostRepository,
};
use crate::data::post_repository::{PostRepository, PostgresPostRepository};
use crate::infrastructure::clock::Clock;
use crate::infrastructure::config::{AppConfig, ContentSourceKind};
use crate::infrastructure::security::JwtKeys;
use crate::presentation::dto::HealthResponse;
use crate::presentation::handlers;
use crate::presentation::middleware::{JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware};
use crate::presentation::utils::json_error_handler;

/// The three stores the services are built on.
#[derive(Clone)]
pub struct Repositories {
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub authors: Arc<dyn AuthorRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            posts: Arc::new(PostgresPostRepository::new(pool.clone())),
            comments: Arc::new(PostgresCommentRepository::new(pool.clone())),
            authors: Arc::new(PostgresAuthorRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            posts: Arc::new(InMemoryPostRepository::new()),
            comments: Arc::new(InMemoryCommentRepository::new()),
            authors: Arc::new(InMemoryAuthorRepository::new()),
        }
    }
}

/// Services shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub query: ContentQueryService,
    pub mutations: ContentMutationService,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        clock: Arc<dyn Clock>,
        keys: JwtKeys,
        content_source: ContentSourceKind,
    ) -> Self {
        let content = build_provider(content_source, repos.posts.clone(), clock.clone());
        Self {
            query: ContentQueryService::new(content, repos.comments.clone()),
            mutations: ContentMutationService::new(repos.posts, repos.comments, clock),
            auth: AuthService::new(repos.authors, keys),
        }
    }
}

/// Registers every route, the shared services and the JSON error handler.
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::Data::new(state.query.clone()))
        .app_data(web::Data::new(state.mutations.clone()))
        .app_data(web::Data::new(state.auth.clone()))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/health", web::get().to(health))
        .service(handlers::auth::scope())
        .service(handlers::posts::list_posts)
        .service(handlers::posts::get_post)
        .service(handlers::comments::list_comments)
        .service(handlers::comments::create_comment)
        .service(handlers::admin::scope().wrap(JwtAuthMiddleware::new(state.auth.clone())));
}

pub async fn run(config: AppConfig, state: AppState) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);
    info!(host = %bind_address.0, port = bind_address.1, "HTTP server starting");

    HttpServer::new(move || {
        let cors = build_cors(&config);
        let state = state.clone();

        App::new()
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .configure(|cfg| configure(cfg, &state))
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(anyhow::Error::new)?;

    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
