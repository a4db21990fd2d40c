//! Shared application state.

use std::sync::Arc;

use storefront_db::{Database, DbConfig, DbResult};

use crate::auth::TokenService;
use crate::config::AppConfig;

/// State handed to every handler and middleware.
///
/// Built once at startup; cloning is cheap (pool handle, keys, `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: TokenService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        let tokens = TokenService::new(&config.secret_key, config.jwt_exp_seconds);
        AppState {
            db,
            tokens,
            config: Arc::new(config),
        }
    }

    /// State over a fresh, migrated in-memory database.
    pub async fn for_tests() -> DbResult<Self> {
        let db = Database::new(DbConfig::in_memory()).await?;
        Ok(AppState::new(db, AppConfig::for_tests()))
    }
}
