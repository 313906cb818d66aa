//! File Storage - 文件系统产物存储实现
//!
//! 实现 ArtifactStoragePort trait，每个生成请求一个目录:
//! `{base_dir}/{request_id}/video.mp4`、`{base_dir}/{request_id}/voiceover.wav`

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{ArtifactKind, ArtifactStoragePort, StorageError};

/// 文件系统产物存储
pub struct FileArtifactStorage {
    /// 存储根目录
    base_dir: PathBuf,
}

impl FileArtifactStorage {
    /// 创建新的文件存储
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        Ok(Self { base_dir })
    }

    fn request_dir(&self, request_id: Uuid) -> PathBuf {
        self.base_dir.join(request_id.to_string())
    }
}

#[async_trait]
impl ArtifactStoragePort for FileArtifactStorage {
    fn artifact_path(&self, request_id: Uuid, kind: ArtifactKind) -> PathBuf {
        self.request_dir(request_id).join(kind.file_name())
    }

    async fn save(
        &self,
        request_id: Uuid,
        kind: ArtifactKind,
        data: &[u8],
    ) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(self.request_dir(request_id))
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        let path = self.artifact_path(request_id, kind);
        fs::write(&path, data)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        tracing::debug!(
            request_id = %request_id,
            kind = kind.as_str(),
            size = data.len(),
            "Saved artifact"
        );

        Ok(path)
    }

    async fn read(&self, request_id: Uuid, kind: ArtifactKind) -> Result<Vec<u8>, StorageError> {
        let path = self.artifact_path(request_id, kind);

        if !path.exists() {
            return Err(StorageError::FileNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        fs::read(&path)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))
    }

    async fn exists(&self, request_id: Uuid, kind: ArtifactKind) -> bool {
        self.artifact_path(request_id, kind).exists()
    }

    async fn delete_request(&self, request_id: Uuid) -> Result<(), StorageError> {
        let dir = self.request_dir(request_id);
        if !dir.exists() {
            return Ok(());
        }

        fs::remove_dir_all(&dir)
            .await
            .map_err(|e| StorageError::IoError(e.to_string()))?;

        tracing::info!(request_id = %request_id, "Deleted artifacts");
        Ok(())
    }
}
