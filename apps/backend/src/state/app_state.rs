use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::store::SeaStore;
use crate::ws::hub::WsRegistry;

/// Shared resources handed to every handler and websocket session.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SeaStore>,
    pub security: SecurityConfig,
    websocket_registry: Arc<WsRegistry>,
}

impl AppState {
    pub fn new(store: Arc<SeaStore>, security: SecurityConfig) -> Self {
        Self {
            store,
            security,
            websocket_registry: Arc::new(WsRegistry::new()),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        self.store.db()
    }

    pub fn websocket_registry(&self) -> Arc<WsRegistry> {
        Arc::clone(&self.websocket_registry)
    }
}
