//! Generation Store Port - 生成请求管理
//!
//! 定义生成请求的抽象接口，具体实现在 infrastructure/memory 层

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::generation::{
    ApiKey, AspectRatio, MusicTrack, Prompt, Resolution, VoiceName,
};

/// Generation Store 错误
#[derive(Debug, Error)]
pub enum GenerationStoreError {
    #[error("Generation not found: {0}")]
    NotFound(Uuid),

    #[error("Generation already exists: {0}")]
    AlreadyExists(Uuid),

    #[error("Queue unavailable: {0}")]
    QueueUnavailable(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

/// 生成请求状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationState {
    /// 等待执行
    Pending,
    /// 正在合成配音（含背景音乐下载与混音）
    SynthesizingSpeech,
    /// 正在提交视频生成
    GeneratingVideo,
    /// 正在轮询远程任务
    Polling,
    /// 正在下载视频
    Downloading,
    /// 完成
    Ready,
    /// 失败
    Failed,
}

impl GenerationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationState::Pending => "pending",
            GenerationState::SynthesizingSpeech => "synthesizing_speech",
            GenerationState::GeneratingVideo => "generating_video",
            GenerationState::Polling => "polling",
            GenerationState::Downloading => "downloading",
            GenerationState::Ready => "ready",
            GenerationState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationState::Ready | GenerationState::Failed)
    }
}

/// 生成任务（worker 的输入）
///
/// 凭证在提交时从 CredentialStore 取出，随任务显式传递
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub request_id: Uuid,
    pub prompt: Prompt,
    /// 配音脚本，为 None 时跳过音频
    pub script: Option<String>,
    pub voice: VoiceName,
    /// 背景音乐，仅在有脚本时使用
    pub music: Option<MusicTrack>,
    pub resolution: Resolution,
    pub aspect_ratio: AspectRatio,
    pub credential: Option<ApiKey>,
}

impl GenerationJob {
    pub fn new(prompt: Prompt, voice: VoiceName) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            prompt,
            script: None,
            voice,
            music: None,
            resolution: Resolution::default(),
            aspect_ratio: AspectRatio::default(),
            credential: None,
        }
    }

    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        let script = script.into();
        self.script = if script.trim().is_empty() {
            None
        } else {
            Some(script)
        };
        self
    }

    pub fn with_music(mut self, music: Option<MusicTrack>) -> Self {
        self.music = music;
        self
    }

    pub fn with_credential(mut self, credential: Option<ApiKey>) -> Self {
        self.credential = credential;
        self
    }
}

/// 生成请求记录（对外可见状态）
#[derive(Debug, Clone)]
pub struct GenerationRecord {
    pub request_id: Uuid,
    pub prompt: String,
    pub has_script: bool,
    pub music_id: Option<String>,
    pub state: GenerationState,
    pub progress_message: Option<String>,
    pub error_message: Option<String>,
    pub has_video: bool,
    pub has_audio: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl GenerationRecord {
    pub fn from_job(job: &GenerationJob) -> Self {
        Self {
            request_id: job.request_id,
            prompt: job.prompt.as_str().to_string(),
            has_script: job.script.is_some(),
            music_id: job.music.as_ref().map(|m| m.id.clone()),
            state: GenerationState::Pending,
            progress_message: None,
            error_message: None,
            has_video: false,
            has_audio: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// 是否处于加载中（非终态）
    pub fn is_loading(&self) -> bool {
        !self.state.is_terminal()
    }
}

/// Generation Store Port
///
/// 管理生成请求的生命周期，所有状态存储在内存中
pub trait GenerationStorePort: Send + Sync {
    /// 提交任务到队列
    fn submit(&self, job: GenerationJob) -> Result<Uuid, GenerationStoreError>;

    /// 取出待执行任务（只能取一次）
    fn take_job(&self, request_id: Uuid) -> Option<GenerationJob>;

    /// 获取请求记录
    fn get(&self, request_id: Uuid) -> Option<GenerationRecord>;

    /// 列出所有请求记录（按创建时间倒序）
    fn list(&self) -> Vec<GenerationRecord>;

    /// 设置请求状态
    fn set_state(&self, request_id: Uuid, state: GenerationState)
        -> Result<(), GenerationStoreError>;

    /// 更新进度文案
    fn set_progress(&self, request_id: Uuid, message: &str) -> Result<(), GenerationStoreError>;

    /// 标记完成
    fn set_ready(&self, request_id: Uuid, has_audio: bool) -> Result<(), GenerationStoreError>;

    /// 标记失败并记录错误
    fn set_failed(&self, request_id: Uuid, error: String) -> Result<(), GenerationStoreError>;

    /// 结束时间早于 `retention` 之前的终态请求
    fn expired(&self, retention: Duration) -> Vec<Uuid>;

    /// 移除请求记录
    fn remove(&self, request_id: Uuid) -> Option<GenerationRecord>;
}
