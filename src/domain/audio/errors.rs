//! Audio Context - Errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AudioError {
    #[error("无效的 base64 数据: {0}")]
    InvalidBase64(String),

    #[error("PCM 字节长度不是 2 的倍数: {0} bytes")]
    OddByteLength(usize),

    #[error("无效的采样率: {0}")]
    InvalidSampleRate(u32),

    #[error("无效的声道数: {0}")]
    InvalidChannels(u16),

    #[error("样本数 {samples} 不能被声道数 {channels} 整除")]
    InvalidFrameLayout { samples: usize, channels: u16 },

    #[error("采样率不一致: voice={voice}Hz, music={music}Hz")]
    SampleRateMismatch { voice: u32, music: u32 },
}
