//! PCM 解码
//!
//! TTS 服务返回 base64 编码的 16-bit 有符号小端单声道 PCM

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::{AudioError, AudioSamples};

/// 解码 base64 PCM 为归一化样本
pub fn decode_base64_pcm16(encoded: &str, sample_rate: u32) -> Result<AudioSamples, AudioError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| AudioError::InvalidBase64(e.to_string()))?;

    decode_pcm16_le(&bytes, sample_rate)
}

/// 解码原始 16-bit 小端 PCM 字节为归一化单声道样本
///
/// 奇数长度的输入视为损坏数据，直接报错而不是截断
pub fn decode_pcm16_le(bytes: &[u8], sample_rate: u32) -> Result<AudioSamples, AudioError> {
    if bytes.len() % 2 != 0 {
        return Err(AudioError::OddByteLength(bytes.len()));
    }

    let samples = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect();

    AudioSamples::mono(samples, sample_rate)
}
