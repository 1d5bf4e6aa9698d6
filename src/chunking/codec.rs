use bytes::{Bytes, BytesMut};
use regex::Regex;
use std::sync::LazyLock;

use super::types::{ChunkSplitter, CodecError};

/// 1 MiB, the chunk size used when the coordinator is not configured otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Longest identifier a node can hold as a single file name (NAME_MAX).
pub const MAX_IDENTIFIER_LEN: usize = 255;

const CHUNK_MARKER: &str = "_chunk";

// Leftmost `_chunk<digits>` that is followed only by an optional extension.
static CHUNK_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_chunk(\d+)(?:\.[^.]*)?$").expect("chunk suffix pattern is valid")
});

/// Splits `data` into chunks of `chunk_size` bytes. The last chunk holds the
/// remainder; an empty buffer yields no chunks.
pub fn split(data: impl Into<Bytes>, chunk_size: usize) -> Result<ChunkSplitter, CodecError> {
    if chunk_size == 0 {
        return Err(CodecError::InvalidChunkSize);
    }
    Ok(ChunkSplitter::new(data.into(), chunk_size))
}

pub fn chunk_identifier(file_name: &str, index: u32) -> String {
    let (stem, ext) = split_extension(base_name(file_name));
    format!("{stem}{CHUNK_MARKER}{index:04}{ext}")
}

/// Recovers the sequence index encoded in a chunk identifier.
pub fn parse_chunk_index(identifier: &str) -> Result<u32, CodecError> {
    CHUNK_SUFFIX
        .captures(identifier)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse::<u32>().ok())
        .ok_or_else(|| CodecError::MalformedIdentifier(identifier.to_string()))
}

/// Concatenates chunks in index order, reading each index from its identifier.
pub fn reassemble(parts: Vec<(String, Bytes)>) -> Result<Bytes, CodecError> {
    let indexed = parts
        .into_iter()
        .map(|(identifier, data)| parse_chunk_index(&identifier).map(|index| (index, data)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(reassemble_indexed(indexed))
}

/// Concatenates chunks in ascending order of their explicit index.
pub fn reassemble_indexed(mut parts: Vec<(u32, Bytes)>) -> Bytes {
    parts.sort_by_key(|(index, _)| *index);

    let total: usize = parts.iter().map(|(_, data)| data.len()).sum();
    let mut out = BytesMut::with_capacity(total);
    for (_, data) in parts {
        out.extend_from_slice(&data);
    }
    out.freeze()
}

fn base_name(file_name: &str) -> &str {
    file_name.rsplit(['/', '\\']).next().unwrap_or(file_name)
}

// Leading dots belong to the stem, so ".bashrc" has no extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot) if name[..dot].chars().any(|c| c != '.') => (&name[..dot], &name[dot..]),
        _ => (name, ""),
    }
}
