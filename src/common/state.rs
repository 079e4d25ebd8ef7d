// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::oauth::IdentityProvider;
use crate::common::config::AppConfig;

/// Application state: database pool, identity provider and configuration.
///
/// Built once in `main` and handed to handlers as `Extension<Arc<AppState>>`;
/// nothing in it is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: AppConfig,
    pub identity_provider: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt_secret
    }
}
