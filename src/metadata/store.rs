use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::types::{FileRecord, MetadataDocument};

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metadata document is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type MetadataResult<T> = Result<T, MetadataError>;

pub struct MetadataStore {
    path: PathBuf,
    // Held across every load-modify-save cycle.
    write_lock: Mutex<()>,
}

impl MetadataStore {
    pub fn new(path: impl Into<PathBuf>) -> Arc<Self> {
        Arc::new(Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole document. A missing or blank file is an empty document.
    pub async fn load(&self) -> MetadataResult<MetadataDocument> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(MetadataDocument::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(MetadataDocument::new());
        }
        Ok(serde_json::from_slice(&raw)?)
    }

    pub async fn get(&self, file_name: &str) -> MetadataResult<Option<FileRecord>> {
        Ok(self.load().await?.remove(file_name))
    }

    pub async fn list_files(&self) -> MetadataResult<Vec<String>> {
        Ok(self.load().await?.into_keys().collect())
    }

    /// Replaces the record for `file_name` wholesale.
    pub async fn put(&self, file_name: &str, record: FileRecord) -> MetadataResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.load().await?;
        if document.insert(file_name.to_string(), record).is_some() {
            tracing::debug!("Overwriting metadata for {}", file_name);
        }
        self.save(&document).await
    }

    /// Drops the record for `file_name`, returning it if there was one.
    pub async fn remove(&self, file_name: &str) -> MetadataResult<Option<FileRecord>> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.load().await?;
        let removed = document.remove(file_name);
        if removed.is_some() {
            self.save(&document).await?;
        }
        Ok(removed)
    }

    async fn save(&self, document: &MetadataDocument) -> MetadataResult<()> {
        let encoded = serde_json::to_vec_pretty(document)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "metadata".to_string());
        let tmp = self
            .path
            .with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        let written = async {
            let mut file = fs::File::create(&tmp).await?;
            file.write_all(&encoded).await?;
            file.sync_all().await?;
            fs::rename(&tmp, &self.path).await
        }
        .await;

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}
