//! Storage backend for uploaded avatar images.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{forms::UploadedFile, types::UserId};

const AVATAR_DIR: &str = "avatars";
const DEFAULT_EXTENSION: &str = "bin";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("avatar storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("not an avatar reference: {0}")]
    InvalidReference(String),
}

/// Persists avatar bytes and hands back a reference suitable for the
/// profile record.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait AvatarStorage: Send + Sync {
    async fn save(&self, user_id: UserId, file: &UploadedFile) -> Result<String, StorageError>;

    /// Removes a stored avatar. Deleting a reference that is already gone is
    /// not an error.
    async fn delete(&self, reference: &str) -> Result<(), StorageError>;
}

/// Writes avatars under `<media_root>/avatars/`.
#[derive(Debug, Clone)]
pub struct LocalAvatarStorage {
    media_root: PathBuf,
}

impl LocalAvatarStorage {
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
        }
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }
}

/// Lowercased extension of the uploaded file name, restricted to ASCII
/// alphanumerics so it is safe to reuse on disk.
fn file_extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

#[async_trait]
impl AvatarStorage for LocalAvatarStorage {
    async fn save(&self, user_id: UserId, file: &UploadedFile) -> Result<String, StorageError> {
        let dir = self.media_root.join(AVATAR_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let name = format!(
            "{}.{}",
            Uuid::new_v4(),
            file_extension(file.file_name.as_deref())
        );
        tokio::fs::write(dir.join(&name), &file.data).await?;

        let reference = format!("{}/{}", AVATAR_DIR, name);
        tracing::debug!(%user_id, avatar = %reference, bytes = file.data.len(), "stored avatar");
        Ok(reference)
    }

    async fn delete(&self, reference: &str) -> Result<(), StorageError> {
        let file_name = reference
            .strip_prefix(AVATAR_DIR)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
            .ok_or_else(|| StorageError::InvalidReference(reference.to_string()))?;

        match tokio::fs::remove_file(self.media_root.join(AVATAR_DIR).join(file_name)).await {
            Ok(()) => {
                tracing::debug!(avatar = %reference, "removed avatar");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
