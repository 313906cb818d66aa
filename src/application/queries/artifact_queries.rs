//! Artifact Queries - 产物查询

use std::path::PathBuf;
use uuid::Uuid;

use crate::application::ports::ArtifactKind;

/// 获取产物查询
#[derive(Debug, Clone)]
pub struct GetArtifact {
    pub request_id: Uuid,
    pub kind: ArtifactKind,
}

/// 获取产物响应（由 HTTP 层流式读取文件）
#[derive(Debug, Clone)]
pub struct GetArtifactResponse {
    pub path: PathBuf,
    pub content_type: &'static str,
    pub file_name: String,
}
