//! Generation Context - Errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("无效的提示词: {0}")]
    InvalidPrompt(String),

    #[error("不支持的分辨率: {0}")]
    InvalidResolution(String),

    #[error("不支持的画面比例: {0}")]
    InvalidAspectRatio(String),

    #[error("未知的配音音色: {0}")]
    UnknownVoice(String),

    #[error("无效的 API Key")]
    InvalidApiKey,
}
