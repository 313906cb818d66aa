//! TTS Engine Port - 语音合成引擎抽象
//!
//! 定义 TTS 合成的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::generation::{ApiKey, SpeechRequest};

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// TTS 合成响应
#[derive(Debug, Clone)]
pub struct SpeechResponse {
    /// base64 编码的 16-bit 小端单声道 PCM
    pub audio_base64: String,
    /// 采样率
    pub sample_rate: u32,
}

/// TTS Engine Port
///
/// 外部 TTS 服务的抽象接口
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 将配音脚本合成为 PCM
    async fn synthesize(
        &self,
        credential: &ApiKey,
        request: &SpeechRequest,
    ) -> Result<SpeechResponse, TtsError>;
}
