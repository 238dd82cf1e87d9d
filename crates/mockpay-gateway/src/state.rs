use crate::config::GatewayConfig;
use crate::db::Database;
use crate::gateway::MockGateway;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub db: Arc<Database>,
    pub gateway: MockGateway,
}

impl AppState {
    pub fn new(config: GatewayConfig, db: Database) -> Self {
        let config = Arc::new(config);
        let db = Arc::new(db);
        let gateway = MockGateway::new(config.clone(), db.clone());

        Self {
            config,
            db,
            gateway,
        }
    }
}
