//! `tokio::fs`-backed [`FileSystem`].

use std::path::Path;

use async_trait::async_trait;
use choreokit_core::FileSystemError;

use crate::services::FileSystem;

/// Local disk access.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileSystem;

#[async_trait]
impl FileSystem for StdFileSystem {
    async fn write_file(
        &self,
        dir: &Path,
        name: &str,
        contents: &str,
    ) -> Result<(), FileSystemError> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(FileSystemError::InvalidPath {
                reason: format!("'{name}' is not a file name"),
            });
        }
        let path = dir.join(name);
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| FileSystemError::WriteFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }

    async fn read_file(&self, path: &Path) -> Result<String, FileSystemError> {
        tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FileSystemError::NotFound {
                    path: path.display().to_string(),
                }
            } else {
                FileSystemError::ReadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            }
        })
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn create_dir(&self, dir: &Path) -> Result<(), FileSystemError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| FileSystemError::CreateDirFailed {
                path: dir.display().to_string(),
                reason: e.to_string(),
            })
    }
}
