use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::{Extension, Router};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::handlers::{handle_delete_chunk, handle_get_chunk, handle_health, handle_store_chunk};
use super::protocol::{
    ENDPOINT_DELETE_CHUNK, ENDPOINT_GET_CHUNK, ENDPOINT_HEALTH, ENDPOINT_STORE_CHUNK,
};
use super::registration::{RegistrationState, register_with_coordinator};
use super::store::ChunkStore;
use crate::config::NodeConfig;

/// State shared by all request handlers of one storage node.
pub struct NodeService {
    pub store: ChunkStore,
    registration: RwLock<RegistrationState>,
}

impl NodeService {
    pub fn new(store: ChunkStore) -> Arc<Self> {
        Arc::new(Self {
            store,
            registration: RwLock::new(RegistrationState::Unregistered),
        })
    }

    pub async fn registration_state(&self) -> RegistrationState {
        *self.registration.read().await
    }

    pub(crate) async fn set_registration_state(&self, state: RegistrationState) {
        *self.registration.write().await = state;
    }
}

pub fn router(node: Arc<NodeService>) -> Router {
    Router::new()
        .route(ENDPOINT_STORE_CHUNK, post(handle_store_chunk))
        .route(
            &format!("{}/:filename", ENDPOINT_GET_CHUNK),
            get(handle_get_chunk),
        )
        .route(
            &format!("{}/:filename", ENDPOINT_DELETE_CHUNK),
            delete(handle_delete_chunk),
        )
        .route(ENDPOINT_HEALTH, get(handle_health))
        // Chunk size is a coordinator setting; the node accepts whatever it is sent.
        .layer(DefaultBodyLimit::disable())
        .layer(Extension(node))
}

/// Opens the chunk directory, registers with the coordinator and serves
/// until the listener fails.
pub async fn run(config: NodeConfig) -> Result<()> {
    let store = ChunkStore::open(&config.storage_dir).await?;
    tracing::info!("Chunk directory: {}", store.root().display());

    let node = NodeService::new(store);

    // Bind first so a port conflict fails before we announce ourselves.
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    let state = register_with_coordinator(
        &node,
        &config.coordinator_url,
        &config.advertise_url,
        config.register_attempts,
        config.register_delay,
    )
    .await;
    tracing::info!("Registration state: {:?}", state);

    tracing::info!(
        "Storage node listening on {} (advertised as {})",
        config.bind_addr,
        config.advertise_url
    );
    axum::serve(listener, router(node)).await?;

    Ok(())
}
