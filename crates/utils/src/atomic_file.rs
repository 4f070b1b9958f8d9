//! Atomic file replacement to prevent torn files after a crash

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Which step of an atomic write failed
#[derive(Debug, thiserror::Error)]
pub enum AtomicWriteError {
    /// Path has no parent directory to host the temporary file
    #[error("'{}' has no parent directory", .0.display())]
    NoParent(PathBuf),
    /// Temporary file could not be created, written or synced
    #[error("failed to write temporary file '{}': {source}", .path.display())]
    Temporary { path: PathBuf, source: io::Error },
    /// Temporary file could not be renamed over the destination
    #[error("failed to rename temporary file over '{}': {source}", .path.display())]
    Rename { path: PathBuf, source: io::Error },
}

impl AtomicWriteError {
    /// The I/O error behind the failure
    pub fn into_io(self) -> io::Error {
        match self {
            Self::NoParent(path) => io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' has no parent directory", path.display()),
            ),
            Self::Temporary { source, .. } | Self::Rename { source, .. } => source,
        }
    }
}

/// Write `content` to `path` by writing a temporary sibling and renaming it.
///
/// Readers observe either the previous content or the new content, never a
/// partial file. The parent directory must already exist.
pub async fn write_atomic(path: &Path, content: &[u8]) -> Result<(), AtomicWriteError> {
    let parent = path
        .parent()
        .ok_or_else(|| AtomicWriteError::NoParent(path.to_path_buf()))?;

    // Same directory as the target so the rename never crosses filesystems
    let temp_path = parent.join(format!(".{}.tmp", Uuid::new_v4()));

    if let Err(source) = write_and_sync(&temp_path, content).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(AtomicWriteError::Temporary {
            path: temp_path,
            source,
        });
    }

    if let Err(source) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(AtomicWriteError::Rename {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

async fn write_and_sync(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await?;
    file.write_all(content).await?;
    file.sync_all().await
}
