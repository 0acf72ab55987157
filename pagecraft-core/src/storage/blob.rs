//! Blob storage for uploaded covers, book files and generated PDFs
//!
//! Uploads are stored under content-addressed names, so a repeated upload of
//! the same bytes lands on the blob that is already there. A request that
//! stores several blobs and then fails takes back only the blobs it created.

use super::StoreResult;
use crate::error::StoreError;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::sync::RwLock;

/// Flat namespace of named blobs
#[async_trait]
pub trait BlobStorage: Send + Sync {
    async fn read(&self, name: &str) -> StoreResult<Vec<u8>>;

    /// Store a blob, replacing any previous blob of that name
    async fn write(&self, name: &str, data: Vec<u8>) -> StoreResult<()>;

    async fn exists(&self, name: &str) -> StoreResult<bool>;

    /// Remove a blob; a missing blob is not an error
    async fn remove(&self, name: &str) -> StoreResult<()>;
}

/// Content-addressed file name: first 16 hex chars of the SHA-256 plus the
/// original extension (lower-cased, alphanumeric only)
pub fn content_addressed_name(data: &[u8], original_name: &str) -> String {
    let digest = hex::encode(Sha256::digest(data));
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()));
    match ext {
        Some(ext) => format!("{}.{}", &digest[..16], ext),
        None => digest[..16].to_string(),
    }
}

/// A blob stored by [`put_content_addressed`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub name: String,
    /// False when identical bytes were already stored
    pub created: bool,
}

/// Store `data` under its content-addressed name unless it is already there
pub async fn put_content_addressed(
    storage: &dyn BlobStorage,
    original_name: &str,
    data: Vec<u8>,
) -> StoreResult<StoredBlob> {
    let name = content_addressed_name(&data, original_name);
    if storage.exists(&name).await? {
        tracing::debug!(blob = %name, "identical blob already stored");
        return Ok(StoredBlob {
            name,
            created: false,
        });
    }

    storage.write(&name, data).await?;
    Ok(StoredBlob {
        name,
        created: true,
    })
}

/// Remove the blobs a failed request created; shared blobs stay
pub async fn discard(storage: &dyn BlobStorage, blobs: &[StoredBlob]) {
    for blob in blobs.iter().filter(|b| b.created) {
        match storage.remove(&blob.name).await {
            Ok(()) => tracing::debug!(blob = %blob.name, "discarded blob"),
            Err(e) => tracing::warn!(blob = %blob.name, error = %e, "failed to discard blob"),
        }
    }
}

/// Blobs as files in one directory
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a blob name into the root; names must stay inside it
    fn locate(&self, name: &str) -> StoreResult<PathBuf> {
        let mut relative = PathBuf::new();
        for component in Path::new(name).components() {
            match component {
                Component::Normal(c) => relative.push(c),
                Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) | Component::RootDir => {
                    return Err(StoreError::PermissionDenied(format!(
                        "blob name leaves the storage root: {}",
                        name
                    )));
                }
            }
        }
        if relative.as_os_str().is_empty() {
            return Err(StoreError::PermissionDenied("empty blob name".to_string()));
        }
        Ok(self.root.join(relative))
    }
}

fn io_error(name: &str, e: std::io::Error) -> StoreError {
    match e.kind() {
        ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
        _ => StoreError::Unavailable(format!("{}: {}", name, e)),
    }
}

#[async_trait]
impl BlobStorage for LocalStorage {
    async fn read(&self, name: &str) -> StoreResult<Vec<u8>> {
        let path = self.locate(name)?;
        tokio::fs::read(path).await.map_err(|e| io_error(name, e))
    }

    async fn write(&self, name: &str, data: Vec<u8>) -> StoreResult<()> {
        let path = self.locate(name)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(name, e))?;
        }

        // Served straight from this directory, so never expose a partial file
        let mut staging = path.clone().into_os_string();
        staging.push(".part");
        let staging = PathBuf::from(staging);
        tokio::fs::write(&staging, data)
            .await
            .map_err(|e| io_error(name, e))?;
        if let Err(e) = tokio::fs::rename(&staging, &path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(io_error(name, e));
        }
        Ok(())
    }

    async fn exists(&self, name: &str) -> StoreResult<bool> {
        let path = self.locate(name)?;
        tokio::fs::try_exists(path)
            .await
            .map_err(|e| io_error(name, e))
    }

    async fn remove(&self, name: &str) -> StoreResult<()> {
        let path = self.locate(name)?;
        match tokio::fs::remove_file(path).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(io_error(name, e)),
            _ => Ok(()),
        }
    }
}

/// Blobs in a map (for testing)
#[derive(Default)]
pub struct MemoryStorage {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStorage for MemoryStorage {
    async fn read(&self, name: &str) -> StoreResult<Vec<u8>> {
        let blobs = self.blobs.read().await;
        blobs
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn write(&self, name: &str, data: Vec<u8>) -> StoreResult<()> {
        self.blobs.write().await.insert(name.to_string(), data);
        Ok(())
    }

    async fn exists(&self, name: &str) -> StoreResult<bool> {
        Ok(self.blobs.read().await.contains_key(name))
    }

    async fn remove(&self, name: &str) -> StoreResult<()> {
        self.blobs.write().await.remove(name);
        Ok(())
    }
}
