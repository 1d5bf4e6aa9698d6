//! Reconstruction Engine.
//!
//! Download path: look up the record, fetch one live replica of every
//! chunk, reassemble in index order. All-or-nothing.

use bytes::Bytes;
use futures::stream::{self, StreamExt, TryStreamExt};

use super::error::CoordinatorError;
use super::service::Coordinator;
use crate::chunking::{self, reassemble_indexed};
use crate::metadata::ChunkReplicas;

/// Chunks fetched concurrently during one download.
const FETCH_CONCURRENCY: usize = 8;

impl Coordinator {
    /// Rebuilds `file_name` from its recorded replicas.
    ///
    /// Fails with `ChunkUnavailable` as soon as one chunk has no replica that
    /// answers, even if every other chunk was fetched.
    pub async fn download(&self, file_name: &str) -> Result<Bytes, CoordinatorError> {
        let record = self
            .metadata
            .get(file_name)
            .await?
            .ok_or_else(|| CoordinatorError::FileNotFound(file_name.to_string()))?;

        let mut replicas = record.replicas_by_chunk();
        let fetches: Vec<_> = (0..record.chunk_count)
            .map(|index| {
                // A chunk whose every store failed at upload has no entry at all.
                let candidates = replicas.remove(&index).unwrap_or_else(|| ChunkReplicas {
                    chunk: chunking::chunk_identifier(file_name, index),
                    nodes: Vec::new(),
                });
                self.fetch_any_replica(index, candidates)
            })
            .collect();

        let parts: Vec<(u32, Bytes)> = stream::iter(fetches)
            .buffered(FETCH_CONCURRENCY)
            .try_collect()
            .await?;

        tracing::info!("Reconstructed {} from {} chunks", file_name, parts.len());
        Ok(reassemble_indexed(parts))
    }

    /// Tries the candidates in recorded order until one returns the chunk.
    async fn fetch_any_replica(
        &self,
        index: u32,
        replicas: ChunkReplicas,
    ) -> Result<(u32, Bytes), CoordinatorError> {
        for node in &replicas.nodes {
            match self.client.fetch_chunk(node, &replicas.chunk).await {
                Ok(Some(data)) => {
                    tracing::debug!("Fetched {} from {}", replicas.chunk, node);
                    return Ok((index, data));
                }
                Ok(None) => {
                    tracing::warn!("{} not found on {}", replicas.chunk, node);
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch {} from {}: {}", replicas.chunk, node, e);
                }
            }
        }

        tracing::error!("Chunk {} is missing from all replicas", replicas.chunk);
        Err(CoordinatorError::ChunkUnavailable {
            chunk: replicas.chunk,
        })
    }
}
