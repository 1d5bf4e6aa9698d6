//! File Metadata Module
//!
//! The coordinator's durable record of where every chunk of every file went.
//!
//! The whole document lives in one JSON file that is read in full and
//! rewritten in full on every change. Mutations are serialized through a
//! single lock and land on disk via write-temp-then-rename, so concurrent
//! uploads and deletes cannot lose each other's updates and a crash never
//! leaves a torn document behind.

pub mod store;
pub mod types;

pub use store::{MetadataError, MetadataStore};
pub use types::{ChunkReplicas, FileRecord, MetadataDocument, PlacementEntry};

#[cfg(test)]
mod tests;
