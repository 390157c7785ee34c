use std::sync::Arc;
use sqlx::{Pool, Sqlite};
use crate::config::Config;
use crate::crypto::TokenKeys;
use crate::error::AppError;
use crate::github::GithubClient;

#[derive(Clone)]
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub keys: Arc<TokenKeys>,
    pub github: GithubClient,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Pool<Sqlite>, config: Arc<Config>) -> Result<Self, AppError> {
        let keys = TokenKeys::new(config.jwt_secret.as_bytes(), config.token_expiry_secs);
        let github = GithubClient::new(&config)?;

        Ok(Self {
            db,
            keys: Arc::new(keys),
            github,
            config,
        })
    }
}
