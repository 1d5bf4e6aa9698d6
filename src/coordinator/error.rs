use thiserror::Error;

use crate::chunking::CodecError;
use crate::metadata::MetadataError;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("not enough healthy nodes to replicate: needed {required}, got {available}")]
    InsufficientNodes { required: usize, available: usize },

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("chunk {chunk} is missing from all replicas")]
    ChunkUnavailable { chunk: String },

    #[error("file splits into {0} chunks, more than the chunk index can address")]
    TooManyChunks(usize),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}
