use anyhow::{Result, bail};
use futures::stream::{self, StreamExt};
use std::sync::Arc;

use super::error::CoordinatorError;
use super::handlers::router;
use super::placement::{PlacementStrategy, UniformRandomPlacement};
use super::types::{ClusterStatus, DeleteSummary, FileStatus};
use crate::config::CoordinatorConfig;
use crate::metadata::MetadataStore;
use crate::node::client::{DeleteOutcome, NodeClient};
use crate::registry::NodeRegistry;

/// Upper bound on node calls in flight for one delete.
const DELETE_CONCURRENCY: usize = 16;

/// Coordinator-side state: the node registry, the metadata store and the
/// policy knobs. Built once at startup and shared with every handler.
pub struct Coordinator {
    pub registry: Arc<NodeRegistry>,
    pub metadata: Arc<MetadataStore>,
    pub(super) client: NodeClient,
    pub(super) placement: Box<dyn PlacementStrategy>,
    pub(super) replication_factor: usize,
    pub(super) chunk_size: usize,
}

impl Coordinator {
    pub fn new(config: &CoordinatorConfig) -> Result<Self> {
        if config.replication_factor == 0 {
            bail!("replication factor must be at least 1");
        }
        if config.chunk_size == 0 {
            bail!("chunk size must be at least 1 byte");
        }

        let client = NodeClient::new(config.node_timeout)?;
        Ok(Self {
            registry: NodeRegistry::new(client.clone(), config.probe_timeout),
            metadata: MetadataStore::new(&config.metadata_path),
            client,
            placement: Box::new(UniformRandomPlacement),
            replication_factor: config.replication_factor,
            chunk_size: config.chunk_size,
        })
    }

    pub fn with_placement(mut self, placement: impl PlacementStrategy + 'static) -> Self {
        self.placement = Box::new(placement);
        self
    }

    pub fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn register_node(&self, address: &str) -> usize {
        self.registry.register(address)
    }

    pub fn list_nodes(&self) -> Vec<String> {
        self.registry.addresses()
    }

    pub async fn list_files(&self) -> Result<Vec<String>, CoordinatorError> {
        Ok(self.metadata.list_files().await?)
    }

    /// Removes every recorded replica of `file_name` on a best-effort basis,
    /// then drops the file's metadata regardless of how the nodes answered.
    pub async fn delete(&self, file_name: &str) -> Result<DeleteSummary, CoordinatorError> {
        let record = self
            .metadata
            .get(file_name)
            .await?
            .ok_or_else(|| CoordinatorError::FileNotFound(file_name.to_string()))?;

        let deletions: Vec<_> = record
            .placements
            .iter()
            .map(|entry| async move {
                let outcome = self.client.delete_chunk(&entry.node, &entry.chunk).await;
                (entry, outcome)
            })
            .collect();
        let outcomes: Vec<_> = stream::iter(deletions)
            .buffer_unordered(DELETE_CONCURRENCY)
            .collect()
            .await;

        let mut deleted = 0;
        let mut failed = 0;
        for (entry, outcome) in outcomes {
            match outcome {
                Ok(DeleteOutcome::Deleted) => deleted += 1,
                Ok(DeleteOutcome::NotFound) => {
                    tracing::debug!("{} was already gone from {}", entry.chunk, entry.node);
                    deleted += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to delete {} from {}: {}", entry.chunk, entry.node, e);
                    failed += 1;
                }
            }
        }

        self.metadata.remove(file_name).await?;
        tracing::info!(
            "Deleted {} ({} replicas removed, {} failed)",
            file_name,
            deleted,
            failed
        );

        Ok(DeleteSummary {
            file_name: file_name.to_string(),
            deleted,
            failed,
        })
    }

    /// Registered and currently healthy nodes plus replication health of
    /// every stored file.
    pub async fn status(&self) -> Result<ClusterStatus, CoordinatorError> {
        let document = self.metadata.load().await?;
        let mut healthy_nodes = self.registry.list_healthy().await;
        healthy_nodes.sort();

        let files = document
            .into_iter()
            .map(|(name, record)| FileStatus::from_record(name, &record, self.replication_factor))
            .collect();

        Ok(ClusterStatus {
            replication_factor: self.replication_factor,
            placement_strategy: self.placement.name().to_string(),
            nodes: self.registry.addresses(),
            healthy_nodes,
            files,
        })
    }
}

/// Builds the coordinator from `config` and serves its HTTP API.
pub async fn run(config: CoordinatorConfig) -> Result<()> {
    let coordinator = Arc::new(Coordinator::new(&config)?);
    tracing::info!(
        "Coordinator: replication factor {}, chunk size {} bytes, metadata at {}",
        coordinator.replication_factor(),
        coordinator.chunk_size(),
        coordinator.metadata.path().display()
    );

    let app = router(coordinator, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Coordinator listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
