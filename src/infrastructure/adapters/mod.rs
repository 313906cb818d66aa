//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod decoder;
pub mod fetch;
pub mod storage;
pub mod tts;
pub mod video;

pub use decoder::*;
pub use fetch::*;
pub use storage::*;
pub use tts::*;
pub use video::*;

use reqwest::StatusCode;

/// 远程 API 是否以凭证问题拒绝了请求
///
/// 401/403，或错误体中包含无效 Key / 实体不存在的提示
pub(crate) fn api_error_is_credential(status: StatusCode, body: &str) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || body.contains("API key not valid")
        || body.contains("Requested entity was not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_rejection_detection() {
        assert!(api_error_is_credential(StatusCode::FORBIDDEN, ""));
        assert!(api_error_is_credential(
            StatusCode::BAD_REQUEST,
            r#"{"error": {"message": "API key not valid. Please pass a valid API key."}}"#
        ));
        assert!(api_error_is_credential(
            StatusCode::NOT_FOUND,
            "Requested entity was not found."
        ));
        assert!(!api_error_is_credential(
            StatusCode::INTERNAL_SERVER_ERROR,
            "backend error"
        ));
    }
}
