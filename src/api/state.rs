use std::sync::Arc;

use crate::api::sessions::SessionRegistry;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let sessions = SessionRegistry::new(&config.sessions);
        Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
        }
    }
}
