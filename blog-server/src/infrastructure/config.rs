use std::str::FromStr;

use serde::Deserialize;

/// Where public reads get their posts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSourceKind {
    /// Database-backed posts only.
    Store,
    /// Bundled articles only.
    Static,
    /// Store posts, with bundled articles filling in the slugs the store lacks.
    Layered,
}

impl FromStr for ContentSourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "store" => Ok(Self::Store),
            "static" => Ok(Self::Static),
            "layered" => Ok(Self::Layered),
            other => Err(anyhow::anyhow!(
                "invalid CONTENT_SOURCE '{}': expected store, static or layered",
                other
            )),
        }
    }
}

/// Account created at startup when none exists for `email`.
#[derive(Debug, Deserialize, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_secs: i64,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    pub content_source: ContentSourceKind,
    pub admin: Option<AdminBootstrap>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = var("PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let database_url = var("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let db_max_connections = var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "20".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid DB_MAX_CONNECTIONS: {}", e))?;
        let jwt_secret = var("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let jwt_ttl_secs = var("JWT_TTL_SECS")
            .unwrap_or_else(|| "3600".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid JWT_TTL_SECS: {}", e))?;
        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let content_source = var("CONTENT_SOURCE")
            .map(|s| s.parse::<ContentSourceKind>())
            .transpose()?
            .unwrap_or(ContentSourceKind::Layered);
        let admin = match (var("ADMIN_EMAIL"), var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminBootstrap {
                email,
                password,
                display_name: var("ADMIN_NAME").unwrap_or_else(|| "Editorial Team".into()),
            }),
            (None, None) => None,
            _ => anyhow::bail!("ADMIN_EMAIL and ADMIN_PASSWORD must be set together"),
        };

        Ok(Self {
            host,
            port,
            database_url,
            db_max_connections,
            jwt_secret,
            jwt_ttl_secs,
            cors_origins,
            content_source,
            admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = config_from(&[("JWT_SECRET", "s3cret")]).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, None);
        assert_eq!(config.jwt_ttl_secs, 3600);
        assert_eq!(config.content_source, ContentSourceKind::Layered);
        assert!(config.cors_origins.is_empty());
        assert!(config.admin.is_none());
    }

    #[test]
    fn missing_secret_is_an_error() {
        assert!(config_from(&[]).is_err());
    }

    #[test]
    fn parses_content_source_and_origins() {
        let config = config_from(&[
            ("JWT_SECRET", "x"),
            ("CONTENT_SOURCE", "Static"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
        ])
        .unwrap();

        assert_eq!(config.content_source, ContentSourceKind::Static);
        assert_eq!(config.cors_origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn admin_credentials_must_come_in_pairs() {
        assert!(config_from(&[("JWT_SECRET", "x"), ("ADMIN_EMAIL", "a@b.c")]).is_err());

        let config = config_from(&[
            ("JWT_SECRET", "x"),
            ("ADMIN_EMAIL", "a@b.c"),
            ("ADMIN_PASSWORD", "pw"),
        ])
        .unwrap();
        assert_eq!(config.admin.unwrap().display_name, "Editorial Team");
    }

    #[test]
    fn rejects_unknown_content_source() {
        assert!(config_from(&[("JWT_SECRET", "x"), ("CONTENT_SOURCE", "cms")]).is_err());
    }
}
