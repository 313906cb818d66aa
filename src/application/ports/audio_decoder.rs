//! Audio Decoder Port - 音频解码抽象
//!
//! 将背景音乐等压缩/封装音频解码为样本缓冲

use thiserror::Error;

use crate::domain::audio::AudioSamples;

/// 解码错误
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Audio stream is empty")]
    EmptyStream,
}

/// Audio Decoder Port
pub trait AudioDecoderPort: Send + Sync {
    /// 解码并重采样到目标采样率
    fn decode(&self, data: &[u8], target_sample_rate: u32) -> Result<AudioSamples, DecodeError>;
}
