use std::sync::Arc;

use blog_server::infrastructure::clock::SystemClock;
use blog_server::infrastructure::config::AppConfig;
use blog_server::infrastructure::database::{create_pool, run_migrations};
use blog_server::infrastructure::logging::init_logging;
use blog_server::infrastructure::security::JwtKeys;
use blog_server::server::{self, AppState, Repositories};
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;

    let repos = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url, config.db_max_connections).await?;
            run_migrations(&pool).await?;
            info!("connected to database, migrations applied");
            Repositories::postgres(pool)
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
            Repositories::in_memory()
        }
    };

    let state = AppState::new(
        repos,
        Arc::new(SystemClock),
        JwtKeys::new(config.jwt_secret.clone(), config.jwt_ttl_secs),
        config.content_source,
    );

    if let Some(admin) = &config.admin {
        let author = state.auth.ensure_admin(admin).await?;
        info!(author_id = %author.id, "admin account ready");
    }

    server::run(config, state).await
}
