//! Application state shared by all handlers
//!
//! Built once at startup and read-only afterwards. Every field is cheap to
//! clone (`PgPool` and the token keys are reference counted).

use crate::auth::TokenService;
use crate::config::AppConfig;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Token service with keys derived from the configured secret
    pub tokens: TokenService,
}

impl AppState {
    /// Create the application state
    ///
    /// Fails when the token settings are unusable (unknown algorithm,
    /// lifetime outside one minute to one year).
    pub fn new(db: PgPool, config: &AppConfig) -> anyhow::Result<Self> {
        let tokens = TokenService::from_config(&config.jwt)?;

        Ok(Self { db, tokens })
    }

    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    #[inline]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}
