//! Replication Orchestrator.
//!
//! Upload path: split, check node health, place and store every chunk,
//! then persist the file record in one write.

use bytes::Bytes;
use futures::future::join_all;

use super::error::CoordinatorError;
use super::service::Coordinator;
use super::types::UploadSummary;
use crate::chunking::{self, MAX_IDENTIFIER_LEN};
use crate::metadata::{FileRecord, PlacementEntry};

impl Coordinator {
    /// Stores `data` as `file_name`, replicating every chunk to R nodes.
    ///
    /// Fails with `InsufficientNodes` before touching any node or metadata
    /// when fewer than R nodes are healthy. Individual store failures are
    /// logged and leave the chunk under-replicated; the upload still
    /// succeeds. An existing record for `file_name` is replaced, not merged.
    pub async fn upload(
        &self,
        file_name: &str,
        data: Bytes,
    ) -> Result<UploadSummary, CoordinatorError> {
        validate_file_name(file_name)?;

        let splitter = chunking::split(data, self.chunk_size)?;
        let chunk_count = u32::try_from(splitter.chunk_count())
            .map_err(|_| CoordinatorError::TooManyChunks(splitter.chunk_count()))?;

        // The last index has the widest number, so its identifier is the longest.
        let longest = chunking::chunk_identifier(file_name, chunk_count.saturating_sub(1));
        if longest.len() > MAX_IDENTIFIER_LEN {
            return Err(CoordinatorError::InvalidFileName(file_name.to_string()));
        }

        let size = splitter.total_len() as u64;

        let healthy = self.registry.list_healthy().await;
        if healthy.len() < self.replication_factor {
            tracing::warn!(
                "Rejecting upload of {}: {} healthy node(s), need {}",
                file_name,
                healthy.len(),
                self.replication_factor
            );
            return Err(CoordinatorError::InsufficientNodes {
                required: self.replication_factor,
                available: healthy.len(),
            });
        }

        tracing::info!(
            "Uploading {} ({} bytes, {} chunks) across {} healthy nodes",
            file_name,
            size,
            chunk_count,
            healthy.len()
        );

        let mut placements = Vec::new();
        for chunk in splitter {
            let identifier = chunk.identifier(file_name);
            let targets = self
                .placement
                .select(&identifier, &healthy, self.replication_factor);

            let identifier_ref = identifier.as_str();
            let stores: Vec<_> = targets
                .into_iter()
                .map(|node| {
                    let data = chunk.data.clone();
                    async move {
                        let result = self.client.store_chunk(&node, identifier_ref, data).await;
                        (node, result)
                    }
                })
                .collect();

            for (node, result) in join_all(stores).await {
                match result {
                    Ok(()) => {
                        tracing::debug!("Stored {} on {}", identifier, node);
                        placements.push(PlacementEntry {
                            chunk: identifier.clone(),
                            index: chunk.index,
                            node,
                        });
                    }
                    Err(e) => {
                        tracing::warn!("Failed to store {} on {}: {}", identifier, node, e);
                    }
                }
            }
        }

        let record = FileRecord {
            size,
            chunk_count,
            placements,
        };
        let nodes_used: Vec<String> = record.nodes().into_iter().map(String::from).collect();

        let expected = chunk_count as usize * self.replication_factor;
        if record.placements.len() < expected {
            tracing::warn!(
                "{} is under-replicated: {} of {} replicas stored",
                file_name,
                record.placements.len(),
                expected
            );
        }

        self.metadata.put(file_name, record).await?;

        Ok(UploadSummary {
            file_name: file_name.to_string(),
            size,
            chunk_count,
            nodes_used,
        })
    }
}

/// File names are single path components: they become chunk identifiers on
/// the nodes and a path segment in the download URL.
pub fn validate_file_name(file_name: &str) -> Result<(), CoordinatorError> {
    let invalid = file_name.is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains(['/', '\\'])
        || file_name.chars().any(char::is_control);

    if invalid {
        return Err(CoordinatorError::InvalidFileName(file_name.to_string()));
    }
    Ok(())
}
