use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One successful store of one chunk on one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementEntry {
    /// Identifier the chunk is stored under on the node.
    pub chunk: String,
    /// Position of the chunk in the file.
    pub index: u32,
    /// Address of the node holding the replica.
    pub node: String,
}

/// Everything the coordinator remembers about one uploaded file.
///
/// A chunk may have fewer placements than the replication factor, or none
/// at all, if stores failed during upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub size: u64,
    pub chunk_count: u32,
    pub placements: Vec<PlacementEntry>,
}

/// The replicas recorded for one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkReplicas {
    pub chunk: String,
    /// Candidate nodes, in the order their stores were recorded.
    pub nodes: Vec<String>,
}

impl FileRecord {
    /// Groups placements by chunk index.
    pub fn replicas_by_chunk(&self) -> BTreeMap<u32, ChunkReplicas> {
        let mut grouped: BTreeMap<u32, ChunkReplicas> = BTreeMap::new();
        for entry in &self.placements {
            grouped
                .entry(entry.index)
                .or_insert_with(|| ChunkReplicas {
                    chunk: entry.chunk.clone(),
                    nodes: Vec::new(),
                })
                .nodes
                .push(entry.node.clone());
        }
        grouped
    }

    /// Replica count for every index in `0..chunk_count`.
    pub fn replica_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.chunk_count as usize];
        for entry in &self.placements {
            if let Some(count) = counts.get_mut(entry.index as usize) {
                *count += 1;
            }
        }
        counts
    }

    /// Distinct nodes holding at least one chunk of this file.
    pub fn nodes(&self) -> BTreeSet<&str> {
        self.placements.iter().map(|e| e.node.as_str()).collect()
    }
}

/// File name -> record. Ordered so listings come out sorted.
pub type MetadataDocument = BTreeMap<String, FileRecord>;
