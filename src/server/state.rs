use axum::extract::FromRef;

use crate::catalog_service::CatalogService;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalogService = Arc<CatalogService>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog_service: GuardedCatalogService,
    pub hash: String,
}

impl FromRef<ServerState> for GuardedCatalogService {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog_service.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
