//! Data Transfer Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::{ArtifactKind, GenerationRecord};
use crate::application::{CredentialStatusResponse, VoiceEntry};
use crate::domain::generation::MusicTrack;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self::success(Empty {})
    }
}

// ============================================================================
// Key DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SelectKeyRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct KeyStatusResponse {
    pub has_credential: bool,
}

impl From<CredentialStatusResponse> for KeyStatusResponse {
    fn from(status: CredentialStatusResponse) -> Self {
        Self {
            has_credential: status.has_credential,
        }
    }
}

// ============================================================================
// Catalog DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    pub name: &'static str,
    pub is_default: bool,
}

impl From<VoiceEntry> for VoiceResponse {
    fn from(entry: VoiceEntry) -> Self {
        Self {
            name: entry.name,
            is_default: entry.is_default,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MusicResponse {
    pub id: String,
    pub name: String,
}

impl From<MusicTrack> for MusicResponse {
    fn from(track: MusicTrack) -> Self {
        Self {
            id: track.id,
            name: track.name,
        }
    }
}

// ============================================================================
// Generation DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SubmitGenerationRequest {
    pub prompt: String,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub music_id: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub request_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct GenerationStatusRequest {
    pub request_id: Uuid,
}

/// 生成请求状态视图
#[derive(Debug, Serialize)]
pub struct GenerationView {
    pub request_id: Uuid,
    pub loading: bool,
    pub state: &'static str,
    pub progress: Option<String>,
    pub error: Option<String>,
    pub prompt: String,
    pub has_script: bool,
    pub music_id: Option<String>,
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
    pub created_at: String,
    pub completed_at: Option<String>,
}

/// 产物下载路径
pub fn artifact_url(request_id: Uuid, kind: ArtifactKind) -> String {
    format!("/api/artifact/{}/{}", request_id, kind.as_str())
}

impl From<GenerationRecord> for GenerationView {
    fn from(record: GenerationRecord) -> Self {
        let id = record.request_id;
        Self {
            request_id: id,
            loading: record.is_loading(),
            state: record.state.as_str(),
            progress: record.progress_message,
            error: record.error_message,
            prompt: record.prompt,
            has_script: record.has_script,
            music_id: record.music_id,
            video_url: record
                .has_video
                .then(|| artifact_url(id, ArtifactKind::Video)),
            audio_url: record
                .has_audio
                .then(|| artifact_url(id, ArtifactKind::Audio)),
            created_at: record.created_at.to_rfc3339(),
            completed_at: record.completed_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ArtifactQuery {
    #[serde(default)]
    pub download: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{GenerationJob, GenerationState};
    use crate::domain::generation::{Prompt, VoiceName};

    #[test]
    fn test_view_of_pending_record() {
        let job = GenerationJob::new(Prompt::new("a cat").unwrap(), VoiceName::new("Kore").unwrap());
        let view = GenerationView::from(GenerationRecord::from_job(&job));

        assert!(view.loading);
        assert_eq!(view.state, "pending");
        assert!(view.video_url.is_none());
        assert!(view.audio_url.is_none());
        assert!(view.completed_at.is_none());
    }

    #[test]
    fn test_view_of_ready_record_links_artifacts() {
        let job = GenerationJob::new(Prompt::new("a cat").unwrap(), VoiceName::new("Kore").unwrap());
        let mut record = GenerationRecord::from_job(&job);
        record.state = GenerationState::Ready;
        record.has_video = true;

        let view = GenerationView::from(record);
        assert!(!view.loading);
        assert_eq!(
            view.video_url,
            Some(format!("/api/artifact/{}/video", job.request_id))
        );
        assert!(view.audio_url.is_none());
    }

    #[test]
    fn test_envelope_serialization() {
        let json = serde_json::to_value(ApiResponse::ok()).unwrap();
        assert_eq!(json["errno"], 0);
        assert_eq!(json["error"], "");
        assert!(json["data"].is_object());
    }
}
