use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::ClinicStore;

use crate::jwt::JwtService;

/// Everything a handler needs, passed explicitly through axum's `State`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ClinicStore>,
    pub jwt: Arc<JwtService>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn ClinicStore>) -> Self {
        let jwt = JwtService::new(&config.jwt_secret, config.token_ttl);
        Self {
            config: Arc::new(config),
            store,
            jwt: Arc::new(jwt),
        }
    }
}
