//! Asset Fetcher Port - 远程资源下载

use async_trait::async_trait;
use thiserror::Error;

/// 下载错误
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("HTTP {status} fetching {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to read body: {0}")]
    ReadError(String),
}

impl FetchError {
    /// 服务端拒绝了请求携带的凭证
    ///
    /// 只对附加了 API Key 的下载有意义，第三方资源的 401/403 与凭证无关
    pub fn is_credential_rejected(&self) -> bool {
        matches!(self, FetchError::HttpStatus { status: 401 | 403, .. })
    }
}

/// Asset Fetcher Port
///
/// HTTP GET 下载背景音乐或生成的视频，非 2xx 视为错误
#[async_trait]
pub trait AssetFetcherPort: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}
