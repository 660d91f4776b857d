//! Shared application state.

use std::sync::Arc;

use kasir_db::Database;

use crate::auth::JwtManager;
use crate::config::ApiConfig;

/// Handed to every handler; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_lifetime_secs);
        AppState {
            db,
            jwt: Arc::new(jwt),
            config: Arc::new(config),
        }
    }
}
