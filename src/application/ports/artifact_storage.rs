//! Artifact Storage Port - 出站端口
//!
//! 定义生成产物（视频、配音 WAV）的存储抽象接口

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// 产物存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 产物类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// 生成的视频
    Video,
    /// 配音（可能已混入背景音乐）
    Audio,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Video => "video",
            ArtifactKind::Audio => "audio",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::Video => "video.mp4",
            ArtifactKind::Audio => "voiceover.wav",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ArtifactKind::Video => "video/mp4",
            ArtifactKind::Audio => "audio/wav",
        }
    }
}

impl std::str::FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(ArtifactKind::Video),
            "audio" => Ok(ArtifactKind::Audio),
            _ => Err(format!("Unknown artifact kind: {}", s)),
        }
    }
}

/// Artifact Storage Port - 出站端口
#[async_trait]
pub trait ArtifactStoragePort: Send + Sync {
    /// 获取产物文件路径
    fn artifact_path(&self, request_id: Uuid, kind: ArtifactKind) -> PathBuf;

    /// 保存产物
    async fn save(
        &self,
        request_id: Uuid,
        kind: ArtifactKind,
        data: &[u8],
    ) -> Result<PathBuf, StorageError>;

    /// 读取产物
    async fn read(&self, request_id: Uuid, kind: ArtifactKind) -> Result<Vec<u8>, StorageError>;

    /// 检查产物是否存在
    async fn exists(&self, request_id: Uuid, kind: ArtifactKind) -> bool;

    /// 删除请求的所有产物
    async fn delete_request(&self, request_id: Uuid) -> Result<(), StorageError>;
}
