//! HTTP TTS Client - 调用外部 TTS HTTP 服务
//!
//! 实现 TtsEnginePort trait，通过 generateContent 接口合成语音
//!
//! 外部 TTS API:
//! POST {base_url}/v1beta/models/{model}:generateContent
//! Request: {"contents": [...], "generationConfig": {"responseModalities": ["AUDIO"], ...}}
//! Response: candidates[0].content.parts[*].inlineData = {"mimeType": "audio/L16;codec=pcm;rate=24000", "data": "<base64>"}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{SpeechResponse, TtsEnginePort, TtsError};
use crate::domain::audio::SPEECH_SAMPLE_RATE;
use crate::domain::generation::{ApiKey, SpeechRequest};
use crate::infrastructure::adapters::api_error_is_credential;

/// TTS 请求体 (JSON)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
    speech_config: SpeechConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

/// TTS 响应体
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// HTTP TTS 客户端配置
#[derive(Debug, Clone)]
pub struct HttpTtsClientConfig {
    /// API 基础 URL
    pub base_url: String,
    /// TTS 模型名
    pub model: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpTtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash-preview-tts".to_string(),
            timeout_secs: 120,
        }
    }
}

impl HttpTtsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// HTTP TTS 客户端
pub struct HttpTtsClient {
    client: Client,
    config: HttpTtsClientConfig,
}

impl HttpTtsClient {
    /// 创建新的 HTTP TTS 客户端
    pub fn new(config: HttpTtsClientConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取合成 URL
    fn synthesize_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(request: &SpeechRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(request.script.clone()),
                    inline_data: None,
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["AUDIO"],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: request.voice.as_str().to_string(),
                        },
                    },
                },
            },
        }
    }
}

/// 从响应中提取第一段内联音频
fn extract_audio(response: GenerateContentResponse) -> Result<SpeechResponse, TtsError> {
    let inline = response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .find_map(|p| p.inline_data)
        .ok_or_else(|| TtsError::InvalidResponse("No audio data in response".to_string()))?;

    Ok(SpeechResponse {
        sample_rate: parse_sample_rate(&inline.mime_type).unwrap_or(SPEECH_SAMPLE_RATE),
        audio_base64: inline.data,
    })
}

/// 解析 `audio/L16;codec=pcm;rate=24000` 中的采样率
fn parse_sample_rate(mime_type: &str) -> Option<u32> {
    mime_type
        .split(';')
        .filter_map(|part| part.trim().strip_prefix("rate="))
        .find_map(|rate| rate.parse().ok())
}

#[async_trait]
impl TtsEnginePort for HttpTtsClient {
    async fn synthesize(
        &self,
        credential: &ApiKey,
        request: &SpeechRequest,
    ) -> Result<SpeechResponse, TtsError> {
        let body = Self::build_request(request);

        tracing::debug!(
            url = %self.synthesize_url(),
            script_len = request.script.len(),
            voice = %request.voice,
            "Sending TTS request"
        );

        let response = self
            .client
            .post(self.synthesize_url())
            .header("x-goog-api-key", credential.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else if e.is_connect() {
                    TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
                } else {
                    TtsError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            if api_error_is_credential(status, &error_text) {
                return Err(TtsError::InvalidCredential(format!("HTTP {}", status)));
            }
            return Err(TtsError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let speech = extract_audio(parsed)?;

        tracing::info!(
            sample_rate = speech.sample_rate,
            audio_b64_len = speech.audio_base64.len(),
            "TTS synthesis completed"
        );

        Ok(speech)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generation::VoiceName;

    #[test]
    fn test_config_default() {
        let config = HttpTtsClientConfig::default();
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_config_builder() {
        let config = HttpTtsClientConfig::new("http://example.com:9000/")
            .with_timeout(60)
            .with_model("tts-test");
        let client = HttpTtsClient::new(config).unwrap();
        assert_eq!(
            client.synthesize_url(),
            "http://example.com:9000/v1beta/models/tts-test:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let request = SpeechRequest {
            script: "hello".to_string(),
            voice: VoiceName::new("Kore").unwrap(),
        };
        let json = serde_json::to_value(HttpTtsClient::build_request(&request)).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            json["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Kore"
        );
    }

    #[test]
    fn test_extract_audio() {
        let body = r#"{
            "candidates": [{
                "content": {"parts": [{"inlineData": {"mimeType": "audio/L16;codec=pcm;rate=16000", "data": "AAAA"}}]}
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        let speech = extract_audio(response).unwrap();
        assert_eq!(speech.audio_base64, "AAAA");
        assert_eq!(speech.sample_rate, 16000);
    }

    #[test]
    fn test_extract_audio_missing() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(
            extract_audio(response),
            Err(TtsError::InvalidResponse(_))
        ));
        assert_eq!(parse_sample_rate("audio/pcm"), None);
    }
}
