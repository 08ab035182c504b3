use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::{
    auth::repo::UserStore,
    config::AppConfig,
    storage::FileStorage,
    toys::repo::ToyStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub toys: Arc<ToyStore>,
    pub users: Arc<UserStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let toys_file = FileStorage::new(&config.toys_file);
        info!(path = %toys_file.path().display(), "loading toys");
        let toys = ToyStore::load(toys_file).await.context("load toys")?;

        let users_file = FileStorage::new(&config.users_file);
        info!(path = %users_file.path().display(), "loading users");
        let users = UserStore::load(users_file).await.context("load users")?;

        Ok(Self::from_parts(config, toys, users))
    }

    pub fn from_parts(config: Arc<AppConfig>, toys: ToyStore, users: UserStore) -> Self {
        Self {
            config,
            toys: Arc::new(toys),
            users: Arc::new(users),
        }
    }
}

#[cfg(test)]
impl AppState {
    /// In-memory stores and a throwaway public dir.
    pub async fn fake(toys: serde_json::Value, public_dir: &str) -> Self {
        use crate::{config::JwtConfig, storage::test_support::MemoryStorage};

        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            toys_file: "unused".into(),
            users_file: "unused".into(),
            public_dir: public_dir.into(),
            cors_origins: vec!["http://localhost:3000".into()],
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test".into(),
                audience: "test".into(),
                ttl_minutes: 5,
            },
        });
        let toys = ToyStore::load(MemoryStorage::with_json(toys))
            .await
            .expect("toy store");
        let users = UserStore::load(MemoryStorage::default())
            .await
            .expect("user store");
        Self::from_parts(config, toys, users)
    }
}
