use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("malformed chunk identifier: {0}")]
    MalformedIdentifier(String),
}

/// A contiguous slice of a file plus its position in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: u32,
    pub data: Bytes,
}

impl Chunk {
    /// Name under which this chunk is stored on a node.
    pub fn identifier(&self, file_name: &str) -> String {
        super::codec::chunk_identifier(file_name, self.index)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Lazy iterator over the chunks of a buffer, in ascending index order.
///
/// Cloning the splitter (or calling [`ChunkSplitter::restart`]) starts the
/// sequence over; the underlying buffer is shared, never copied.
#[derive(Debug, Clone)]
pub struct ChunkSplitter {
    data: Bytes,
    chunk_size: usize,
    offset: usize,
    next_index: u32,
}

impl ChunkSplitter {
    pub(crate) fn new(data: Bytes, chunk_size: usize) -> Self {
        Self {
            data,
            chunk_size,
            offset: 0,
            next_index: 0,
        }
    }

    /// Total number of chunks the buffer splits into.
    pub fn chunk_count(&self) -> usize {
        self.data.len().div_ceil(self.chunk_size)
    }

    /// Length of the buffer being split.
    pub fn total_len(&self) -> usize {
        self.data.len()
    }

    pub fn restart(&mut self) {
        self.offset = 0;
        self.next_index = 0;
    }
}

impl Iterator for ChunkSplitter {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.offset >= self.data.len() {
            return None;
        }

        let end = self
            .offset
            .saturating_add(self.chunk_size)
            .min(self.data.len());
        let chunk = Chunk {
            index: self.next_index,
            data: self.data.slice(self.offset..end),
        };

        self.offset = end;
        self.next_index += 1;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.data.len() - self.offset).div_ceil(self.chunk_size);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChunkSplitter {}
