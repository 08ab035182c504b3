use anyhow::Context;
use serde::Deserialize;

const DEFAULT_CORS_ORIGINS: &str =
    "http://127.0.0.1:8080,http://localhost:8080,http://127.0.0.1:3000,http://localhost:3000";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub toys_file: String,
    pub users_file: String,
    pub public_dir: String,
    pub cors_origins: Vec<String>,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = std::env::var("APP_PORT")
            .unwrap_or_else(|_| "3030".into())
            .parse::<u16>()
            .context("APP_PORT must be a port number")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "toyshop".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "toyshop-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };
        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            toys_file: std::env::var("TOYS_FILE").unwrap_or_else(|_| "data/toy.json".into()),
            users_file: std::env::var("USERS_FILE").unwrap_or_else(|_| "data/user.json".into()),
            public_dir: std::env::var("PUBLIC_DIR").unwrap_or_else(|_| "public".into()),
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into()),
            ),
            jwt,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_origins_cover_both_dev_ports() {
        let origins = parse_origins(DEFAULT_CORS_ORIGINS);
        assert_eq!(origins.len(), 4);
        assert!(origins.contains(&"http://localhost:3000".to_string()));
    }

    #[test]
    fn origins_skip_blanks_and_whitespace() {
        let origins = parse_origins(" http://a.test , ,http://b.test,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }
}
