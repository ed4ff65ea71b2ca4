use std::sync::Arc;

use proofdesk_core::artwork::store::ArtworkStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Batch and item persistence (Postgres in production, in-memory in tests).
    pub store: Arc<dyn ArtworkStore>,
    /// Server configuration (read by the auth extractors and handlers).
    pub config: Arc<ServerConfig>,
}
