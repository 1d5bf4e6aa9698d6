//! Chunk Codec Module
//!
//! Pure splitting and reassembly logic. No I/O happens here: callers hand in
//! the whole file as `Bytes` and get back zero-copy slices.
//!
//! ## Naming
//! Every chunk is stored under `{stem}_chunk{index:04}{ext}`, e.g. the third
//! chunk of `resume.pdf` is `resume_chunk0002.pdf`. The index can be
//! recovered from the identifier, but the coordinator also records it
//! explicitly next to each placement so reconstruction never depends on
//! parsing names.

pub mod codec;
pub mod types;

pub use codec::{
    DEFAULT_CHUNK_SIZE, MAX_IDENTIFIER_LEN, chunk_identifier, parse_chunk_index, reassemble,
    reassemble_indexed, split,
};
pub use types::{Chunk, ChunkSplitter, CodecError};
