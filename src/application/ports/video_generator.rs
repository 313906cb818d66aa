//! Video Generator Port - 视频生成服务抽象
//!
//! 定义远程视频生成（长任务）的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::generation::{ApiKey, Operation, VideoGenerationRequest};

/// 视频生成错误
#[derive(Debug, Error)]
pub enum VideoError {
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

/// Video Generator Port
///
/// 外部视频生成服务的抽象接口
#[async_trait]
pub trait VideoGeneratorPort: Send + Sync {
    /// 提交视频生成任务，返回远程任务句柄
    async fn generate(
        &self,
        credential: &ApiKey,
        request: &VideoGenerationRequest,
    ) -> Result<Operation, VideoError>;

    /// 刷新远程任务状态
    async fn refresh(&self, credential: &ApiKey, operation: &Operation)
        -> Result<Operation, VideoError>;
}
