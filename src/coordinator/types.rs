use serde::{Deserialize, Serialize};

use crate::metadata::FileRecord;

/// Outcome of a successful upload. Replicas that failed to store are not
/// reported here; `Coordinator::status` shows per-chunk replica counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSummary {
    pub file_name: String,
    pub size: u64,
    pub chunk_count: u32,
    /// Nodes that acknowledged at least one chunk, sorted.
    pub nodes_used: Vec<String>,
}

/// Node-side outcome of a delete. Informational only: the metadata entry is
/// gone either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSummary {
    pub file_name: String,
    /// Replicas a node confirmed as removed (or already absent).
    pub deleted: usize,
    /// Replicas whose node could not be reached or returned an error.
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStatus {
    pub name: String,
    pub size: u64,
    pub chunk_count: u32,
    pub placements: usize,
    /// Chunks with at least one but fewer than R replicas.
    pub under_replicated_chunks: usize,
    /// Chunks with no replica at all; the file cannot be downloaded.
    pub missing_chunks: usize,
}

impl FileStatus {
    pub fn from_record(name: String, record: &FileRecord, replication_factor: usize) -> Self {
        let counts = record.replica_counts();
        Self {
            name,
            size: record.size,
            chunk_count: record.chunk_count,
            placements: record.placements.len(),
            under_replicated_chunks: counts
                .iter()
                .filter(|&&c| c > 0 && c < replication_factor)
                .count(),
            missing_chunks: counts.iter().filter(|&&c| c == 0).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterStatus {
    pub replication_factor: usize,
    pub placement_strategy: String,
    pub nodes: Vec<String>,
    pub healthy_nodes: Vec<String>,
    pub files: Vec<FileStatus>,
}
