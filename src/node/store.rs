//! Local chunk namespace.
//!
//! One file per chunk identifier, directly under the storage directory.
//! Writes go to a fixed-length temp file under `.tmp/` first and are renamed
//! into place, so a reader never observes a half-written chunk.

use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::chunking::MAX_IDENTIFIER_LEN;

/// Subdirectory of the storage root holding in-flight writes.
const TEMP_DIR: &str = ".tmp";

#[derive(Debug, Error)]
pub enum ChunkStoreError {
    #[error("invalid chunk name: {0:?}")]
    InvalidChunkName(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct ChunkStore {
    root: PathBuf,
}

impl ChunkStore {
    /// Opens (and creates, if needed) the storage directory.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, ChunkStoreError> {
        let root = root.into();
        fs::create_dir_all(root.join(TEMP_DIR)).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `data` under `name`, replacing any previous content.
    pub async fn store(&self, name: &str, data: &[u8]) -> Result<(), ChunkStoreError> {
        let path = self.chunk_path(name)?;
        let tmp = self
            .root
            .join(TEMP_DIR)
            .join(format!("{}.tmp", Uuid::new_v4()));

        let written = async {
            let mut file = fs::File::create(&tmp).await?;
            file.write_all(data).await?;
            file.sync_all().await?;
            fs::rename(&tmp, &path).await
        }
        .await;

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp).await
                && cleanup.kind() != ErrorKind::NotFound
            {
                tracing::warn!("Failed to remove temp file {}: {}", tmp.display(), cleanup);
            }
            return Err(e.into());
        }

        tracing::debug!("Stored chunk {} ({} bytes)", name, data.len());
        Ok(())
    }

    pub async fn fetch(&self, name: &str) -> Result<Option<Bytes>, ChunkStoreError> {
        let path = self.chunk_path(name)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes `name`. Returns `false` when there was nothing to remove.
    pub async fn delete(&self, name: &str) -> Result<bool, ChunkStoreError> {
        let path = self.chunk_path(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Identifiers of all stored chunks, sorted. In-flight writes live in a
    /// subdirectory and are skipped with it.
    pub async fn list(&self) -> Result<Vec<String>, ChunkStoreError> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn chunk_path(&self, name: &str) -> Result<PathBuf, ChunkStoreError> {
        validate_chunk_name(name)?;
        Ok(self.root.join(name))
    }
}

/// Chunk identifiers must be plain file names inside the storage directory.
pub fn validate_chunk_name(name: &str) -> Result<(), ChunkStoreError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name == TEMP_DIR
        || name.len() > MAX_IDENTIFIER_LEN
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_control);

    if invalid {
        return Err(ChunkStoreError::InvalidChunkName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_chunk_name() {
        assert!(validate_chunk_name("resume_chunk0000.pdf").is_ok());
        assert!(validate_chunk_name("no extension_chunk0001").is_ok());
        assert!(validate_chunk_name(".env_chunk0000").is_ok());
        assert!(validate_chunk_name("x..y_chunk0000").is_ok());

        let too_long = "a".repeat(MAX_IDENTIFIER_LEN + 1);
        let bad_names = [
            "",
            ".",
            "..",
            ".tmp",
            "../escape",
            "a/b",
            "a\\b",
            "nul\0",
            too_long.as_str(),
        ];
        for bad in bad_names {
            assert!(
                matches!(
                    validate_chunk_name(bad),
                    Err(ChunkStoreError::InvalidChunkName(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }
}
