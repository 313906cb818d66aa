//! HTTP Video Client - 调用远程视频生成服务
//!
//! 外部视频生成 API:
//! POST {base_url}/v1beta/models/{model}:predictLongRunning
//! Request: {"instances": [{"prompt": "..."}], "parameters": {"sampleCount": 1, "resolution": "720p", "aspectRatio": "9:16"}}
//! Response: {"name": "models/.../operations/..."}
//!
//! GET {base_url}/v1beta/{operation.name}
//! Response: {"name", "done", "error": {"code", "message"}, "response": {"generateVideoResponse": {"generatedSamples": [{"video": {"uri"}}]}}}

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{VideoError, VideoGeneratorPort};
use crate::domain::generation::{ApiKey, Operation, OperationError, VideoGenerationRequest};
use crate::infrastructure::adapters::api_error_is_credential;

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: Vec<PredictInstance<'a>>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u8,
    resolution: &'static str,
    aspect_ratio: &'static str,
}

/// 远程任务响应
#[derive(Debug, Deserialize)]
struct OperationResponse {
    name: String,
    #[serde(default)]
    done: bool,
    error: Option<OperationErrorBody>,
    response: Option<OperationResult>,
}

#[derive(Debug, Deserialize)]
struct OperationErrorBody {
    code: Option<i32>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResult {
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Deserialize)]
struct GeneratedSample {
    video: Option<VideoRef>,
}

#[derive(Debug, Deserialize)]
struct VideoRef {
    uri: Option<String>,
}

impl From<OperationResponse> for Operation {
    fn from(resp: OperationResponse) -> Self {
        let video_uri = resp
            .response
            .and_then(|r| r.generate_video_response)
            .and_then(|r| r.generated_samples.into_iter().next())
            .and_then(|s| s.video)
            .and_then(|v| v.uri);

        Operation {
            name: resp.name,
            done: resp.done,
            error: resp.error.map(|e| OperationError {
                code: e.code,
                message: e.message,
            }),
            video_uri,
        }
    }
}

/// HTTP 视频客户端配置
#[derive(Debug, Clone)]
pub struct HttpVideoClientConfig {
    pub base_url: String,
    pub model: String,
    /// 单次请求超时（秒），不限制整个长任务
    pub timeout_secs: u64,
}

impl Default for HttpVideoClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "veo-3.0-fast-generate-preview".to_string(),
            timeout_secs: 60,
        }
    }
}

/// HTTP 视频生成客户端
pub struct HttpVideoClient {
    client: Client,
    config: HttpVideoClientConfig,
}

impl HttpVideoClient {
    pub fn new(config: HttpVideoClientConfig) -> Result<Self, VideoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VideoError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:predictLongRunning",
            self.base(),
            self.config.model
        )
    }

    fn operation_url(&self, name: &str) -> String {
        format!("{}/v1beta/{}", self.base(), name.trim_start_matches('/'))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Operation, VideoError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                VideoError::Timeout
            } else {
                VideoError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            if api_error_is_credential(status, &error_text) {
                return Err(VideoError::InvalidCredential(format!("HTTP {}", status)));
            }
            return Err(VideoError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: OperationResponse = response
            .json()
            .await
            .map_err(|e| VideoError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(body.into())
    }
}

#[async_trait]
impl VideoGeneratorPort for HttpVideoClient {
    async fn generate(
        &self,
        credential: &ApiKey,
        request: &VideoGenerationRequest,
    ) -> Result<Operation, VideoError> {
        let body = PredictRequest {
            instances: vec![PredictInstance {
                prompt: request.prompt.as_str(),
            }],
            parameters: PredictParameters {
                sample_count: request.number_of_videos,
                resolution: request.resolution.as_str(),
                aspect_ratio: request.aspect_ratio.as_str(),
            },
        };

        tracing::info!(
            model = %self.config.model,
            resolution = request.resolution.as_str(),
            aspect_ratio = request.aspect_ratio.as_str(),
            "Submitting video generation"
        );

        let operation = self
            .send(
                self.client
                    .post(self.generate_url())
                    .header("x-goog-api-key", credential.expose())
                    .json(&body),
            )
            .await?;

        tracing::info!(operation = %operation.name, "Video generation accepted");
        Ok(operation)
    }

    async fn refresh(
        &self,
        credential: &ApiKey,
        operation: &Operation,
    ) -> Result<Operation, VideoError> {
        self.send(
            self.client
                .get(self.operation_url(&operation.name))
                .header("x-goog-api-key", credential.expose()),
        )
        .await
    }
}
