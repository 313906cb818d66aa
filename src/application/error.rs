//! 应用层错误定义
//!
//! 统一的命令/查询/生成流程错误类型

use thiserror::Error;

use crate::application::ports::{
    DecodeError, FetchError, GenerationStoreError, StorageError, TtsError, VideoError,
};
use crate::domain::audio::AudioError;
use crate::domain::generation::GenerationError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 未选择 API Key
    #[error("No API key selected, please select a valid key")]
    MissingCredential,

    /// API Key 被远程服务拒绝
    #[error("API key rejected ({0}), please select a valid key")]
    InvalidCredential(String),

    /// 网络/传输错误（轮询或下载）
    #[error("{0}")]
    Transport(String),

    /// 远程任务报告失败
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    /// 任务完成但没有可下载的结果
    #[error("Video generation finished without a downloadable result")]
    NoResult,

    /// 音频解码/混音错误
    #[error("Audio error: {0}")]
    AudioError(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    /// 是否是凭证类错误（需要撤销已选 Key）
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            ApplicationError::MissingCredential | ApplicationError::InvalidCredential(_)
        )
    }
}

impl From<GenerationError> for ApplicationError {
    fn from(err: GenerationError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<AudioError> for ApplicationError {
    fn from(err: AudioError) -> Self {
        Self::AudioError(err.to_string())
    }
}

impl From<DecodeError> for ApplicationError {
    fn from(err: DecodeError) -> Self {
        Self::AudioError(format!("failed to decode music: {}", err))
    }
}

impl From<TtsError> for ApplicationError {
    fn from(err: TtsError) -> Self {
        match err {
            TtsError::InvalidCredential(msg) => Self::InvalidCredential(msg),
            TtsError::NetworkError(_) | TtsError::Timeout => {
                Self::Transport(format!("speech synthesis failed: {}", err))
            }
            other => Self::ExternalServiceError(format!("speech synthesis failed: {}", other)),
        }
    }
}

impl From<VideoError> for ApplicationError {
    fn from(err: VideoError) -> Self {
        match err {
            VideoError::InvalidCredential(msg) => Self::InvalidCredential(msg),
            VideoError::NetworkError(_) | VideoError::Timeout => {
                Self::Transport(format!("video request failed: {}", err))
            }
            other => Self::ExternalServiceError(format!("video request failed: {}", other)),
        }
    }
}

impl From<FetchError> for ApplicationError {
    fn from(err: FetchError) -> Self {
        Self::Transport(format!("download failed: {}", err))
    }
}

impl From<StorageError> for ApplicationError {
    fn from(err: StorageError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<GenerationStoreError> for ApplicationError {
    fn from(err: GenerationStoreError) -> Self {
        match err {
            GenerationStoreError::NotFound(id) => Self::not_found("Generation", id),
            other => Self::InternalError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_classification() {
        assert!(ApplicationError::MissingCredential.is_credential_error());
        let err: ApplicationError = VideoError::InvalidCredential("403".into()).into();
        assert!(err.is_credential_error());
        let err: ApplicationError = FetchError::HttpStatus {
            status: 403,
            url: "https://cdn.example.com/music.mp3".into(),
        }
        .into();
        assert!(matches!(err, ApplicationError::Transport(_)));
        assert!(!err.is_credential_error());
        assert!(!ApplicationError::NoResult.is_credential_error());
    }

    #[test]
    fn test_generation_failed_message_contains_reason() {
        let err = ApplicationError::GenerationFailed("quota exceeded".into());
        assert_eq!(err.to_string(), "generation failed: quota exceeded");
    }

    #[test]
    fn test_fetch_error_is_transport() {
        let err: ApplicationError = FetchError::HttpStatus {
            status: 500,
            url: "https://cdn/music.mp3".into(),
        }
        .into();
        assert!(matches!(err, ApplicationError::Transport(_)));
        assert!(err.to_string().contains("HTTP 500"));
    }
}
