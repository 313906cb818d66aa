//! HTTP Asset Fetcher - 下载背景音乐和生成的视频

use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;

use crate::application::ports::{AssetFetcherPort, FetchError};

/// HTTP 资源下载器
pub struct HttpAssetFetcher {
    client: Client,
}

impl HttpAssetFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;

        Ok(Self { client })
    }
}

/// 去掉查询串，避免 API Key 出现在日志和错误信息里
fn redact(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.to_string()
}

#[async_trait]
impl AssetFetcherPort for HttpAssetFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        let redacted_url = redact(&parsed);

        tracing::debug!(url = %redacted_url, "Fetching asset");

        let response = self.client.get(parsed).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::NetworkError(e.without_url().to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %redacted_url, status = status.as_u16(), "Asset fetch rejected");
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: redacted_url,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::ReadError(e.without_url().to_string()))?;

        tracing::info!(url = %redacted_url, size = bytes.len(), "Asset fetched");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_strips_key() {
        let url = Url::parse("https://files.example.com/v1/abc:download?alt=media&key=secret")
            .unwrap();
        let redacted = redact(&url);
        assert_eq!(redacted, "https://files.example.com/v1/abc:download");
        assert!(!redacted.contains("secret"));
    }

    /// 本地资源服务：/ok 返回固定字节，其余返回 403
    async fn serve_assets() -> String {
        use axum::{http::StatusCode, routing::get, Router};

        let app = Router::new()
            .route("/ok", get(|| async { "asset-bytes" }))
            .fallback(|| async { StatusCode::FORBIDDEN });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_success_and_rejection() {
        let base = serve_assets().await;
        let fetcher = HttpAssetFetcher::new(5).unwrap();

        let bytes = fetcher.fetch(&format!("{}/ok", base)).await.unwrap();
        assert_eq!(bytes, b"asset-bytes");

        let err = fetcher
            .fetch(&format!("{}/private.mp4?key=secret", base))
            .await
            .unwrap_err();
        match err {
            FetchError::HttpStatus { status, url } => {
                assert_eq!(status, 403);
                assert_eq!(url, format!("{}/private.mp4", base));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let fetcher = HttpAssetFetcher::new(5).unwrap();
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
