//! Fake TTS Client - 用于测试的 TTS 客户端
//!
//! 始终返回固定频率的正弦波 PCM，不实际调用 TTS 服务

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::{SpeechResponse, TtsEnginePort, TtsError};
use crate::domain::audio::SPEECH_SAMPLE_RATE;
use crate::domain::generation::{ApiKey, SpeechRequest};

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 固定返回的音频时长（毫秒）
    pub duration_ms: u64,
    /// 采样率
    pub sample_rate: u32,
    /// 正弦波频率
    pub frequency_hz: f32,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            duration_ms: 500,
            sample_rate: SPEECH_SAMPLE_RATE,
            frequency_hz: 440.0,
        }
    }
}

/// Fake TTS Client
///
/// 用于测试，始终返回同一段 base64 PCM
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
    /// 缓存的 base64 音频
    audio_base64: String,
    calls: AtomicUsize,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Self {
        let frames = (config.sample_rate as u64 * config.duration_ms / 1000) as usize;
        let pcm: Vec<u8> = (0..frames)
            .map(|i| {
                let t = i as f32 / config.sample_rate as f32;
                let value = (t * config.frequency_hz * std::f32::consts::TAU).sin() * 0.5;
                (value * 32767.0) as i16
            })
            .flat_map(|s| s.to_le_bytes())
            .collect();

        tracing::info!(
            duration_ms = config.duration_ms,
            sample_rate = config.sample_rate,
            "FakeTtsClient initialized"
        );

        Self {
            audio_base64: STANDARD.encode(pcm),
            config,
            calls: AtomicUsize::new(0),
        }
    }

    /// 使用默认配置创建
    pub fn with_defaults() -> Self {
        Self::new(FakeTtsClientConfig::default())
    }

    /// 返回的 base64 PCM
    pub fn audio_base64(&self) -> String {
        self.audio_base64.clone()
    }

    /// 合成调用次数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(
        &self,
        _credential: &ApiKey,
        request: &SpeechRequest,
    ) -> Result<SpeechResponse, TtsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            script_len = request.script.len(),
            voice = %request.voice,
            "FakeTtsClient: returning fixed audio"
        );

        Ok(SpeechResponse {
            audio_base64: self.audio_base64.clone(),
            sample_rate: self.config.sample_rate,
        })
    }
}
