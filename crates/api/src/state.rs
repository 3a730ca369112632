use std::sync::Arc;

use misarfeh_core::upload::UploadNamer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: misarfeh_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Names stored uploads; shared so stamps stay unique across requests.
    pub upload_namer: Arc<UploadNamer>,
}

impl AppState {
    pub fn new(pool: misarfeh_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            upload_namer: Arc::new(UploadNamer::new()),
        }
    }
}
