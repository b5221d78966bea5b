//! Filesystem port used by the package manager facade.

use std::path::Path;

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Rename, write and read primitives.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    fn rename_sync(&self, from: &Path, to: &Path) -> Result<()>;

    async fn write_file(&self, path: &Path, contents: &str) -> Result<()>;

    fn write_file_sync(&self, path: &Path, contents: &str) -> Result<()>;

    fn read_to_string(&self, path: &Path) -> Result<String>;
}

/// [`FileStore`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileStore;

impl OsFileStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileStore for OsFileStore {
    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        tokio::fs::rename(from, to).await.map_err(Error::Io)
    }

    fn rename_sync(&self, from: &Path, to: &Path) -> Result<()> {
        std::fs::rename(from, to).map_err(Error::Io)
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        tokio::fs::write(path, contents).await.map_err(Error::Io)
    }

    fn write_file_sync(&self, path: &Path, contents: &str) -> Result<()> {
        std::fs::write(path, contents).map_err(Error::Io)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(Error::Io)
    }
}
