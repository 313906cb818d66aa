//! Symphonia Decoder - 解码背景音乐（WAV / MP3）
//!
//! 实现 AudioDecoderPort，解码后线性重采样到配音的采样率

use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioDecoderPort, DecodeError};
use crate::domain::audio::AudioSamples;

/// 基于 symphonia 的解码器
#[derive(Debug, Default, Clone)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self
    }

    /// 解码为交错 f32 样本，返回 (samples, sample_rate, channels)
    fn decode_interleaved(&self, data: &[u8]) -> Result<(Vec<f32>, u32, u16), DecodeError> {
        let cursor = Cursor::new(data.to_vec());
        let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

        let probed = symphonia::default::get_probe()
            .format(
                &Hint::new(),
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| DecodeError::UnsupportedFormat(format!("Probe failed: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| DecodeError::DecodingError("No audio track found".to_string()))?;

        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| DecodeError::DecodingError("Unknown sample rate".to_string()))?;

        let mut channels = track.codec_params.channels.map(|c| c.count() as u16);

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| DecodeError::UnsupportedFormat(format!("Decoder creation failed: {}", e)))?;

        let track_id = track.id;
        let mut samples: Vec<f32> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    return Err(DecodeError::DecodingError(format!(
                        "Packet read error: {}",
                        e
                    )));
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                Err(SymphoniaError::DecodeError(e)) => {
                    tracing::warn!(error = %e, "Decode error (skipping packet)");
                    continue;
                }
                Err(e) => return Err(DecodeError::DecodingError(e.to_string())),
            };

            let spec = *decoded.spec();
            let num_frames = decoded.frames();
            // MP3 的声道数只有解码后才知道
            channels.get_or_insert(spec.channels.count() as u16);

            let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
            sample_buf.copy_interleaved_ref(decoded);
            let actual_samples = num_frames * spec.channels.count();
            samples.extend(&sample_buf.samples()[..actual_samples]);
        }

        let channels = channels
            .ok_or_else(|| DecodeError::DecodingError("Unknown channel count".to_string()))?;

        if samples.is_empty() {
            return Err(DecodeError::EmptyStream);
        }

        Ok((samples, sample_rate, channels))
    }
}

/// 简单线性重采样
fn resample(samples: &[f32], from_rate: u32, to_rate: u32, channels: u16) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let channel_count = channels as usize;
    let frame_count = samples.len() / channel_count;
    let new_frame_count = (frame_count as f64 * ratio) as usize;
    let mut resampled = Vec::with_capacity(new_frame_count * channel_count);

    for i in 0..new_frame_count {
        let src_pos = i as f64 / ratio;
        let src_idx = src_pos as usize;
        let frac = (src_pos - src_idx as f64) as f32;
        let next_idx = (src_idx + 1).min(frame_count - 1);

        for ch in 0..channel_count {
            let s0 = samples.get(src_idx * channel_count + ch).copied().unwrap_or(0.0);
            let s1 = samples
                .get(next_idx * channel_count + ch)
                .copied()
                .unwrap_or(s0);
            resampled.push(s0 + (s1 - s0) * frac);
        }
    }

    resampled
}

impl AudioDecoderPort for SymphoniaDecoder {
    fn decode(&self, data: &[u8], target_sample_rate: u32) -> Result<AudioSamples, DecodeError> {
        let (samples, sample_rate, channels) = self.decode_interleaved(data)?;
        let samples = resample(&samples, sample_rate, target_sample_rate, channels);

        tracing::debug!(
            source_rate = sample_rate,
            target_rate = target_sample_rate,
            channels = channels,
            samples = samples.len(),
            "Music decoded"
        );

        AudioSamples::new(samples, target_sample_rate, channels)
            .map_err(|e| DecodeError::DecodingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::encode_wav;

    fn wav(samples: Vec<f32>, rate: u32, channels: u16) -> Vec<u8> {
        encode_wav(&AudioSamples::new(samples, rate, channels).unwrap())
    }

    #[test]
    fn test_decode_wav_same_rate() {
        let data = wav(vec![0.0, 0.5, -0.5, 0.25], 24000, 1);
        let decoded = SymphoniaDecoder::new().decode(&data, 24000).unwrap();

        assert_eq!(decoded.sample_rate(), 24000);
        assert_eq!(decoded.channels(), 1);
        assert_eq!(decoded.frames(), 4);
        for (got, want) in decoded.samples().iter().zip([0.0, 0.5, -0.5, 0.25]) {
            assert!((got - want).abs() < 1e-3, "{} vs {}", got, want);
        }
    }

    #[test]
    fn test_decode_resamples_to_target() {
        let data = wav(vec![0.25; 4800 * 2], 48000, 2);
        let decoded = SymphoniaDecoder::new().decode(&data, 24000).unwrap();

        assert_eq!(decoded.sample_rate(), 24000);
        assert_eq!(decoded.channels(), 2);
        assert_eq!(decoded.frames(), 2400);
        assert!(decoded.samples().iter().all(|s| (s - 0.25).abs() < 1e-3));
    }

    #[test]
    fn test_decode_garbage_is_rejected() {
        let err = SymphoniaDecoder::new()
            .decode(b"definitely not audio", 24000)
            .unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_resample_identity() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(resample(&samples, 24000, 24000, 1), samples);
    }

    #[test]
    fn test_resample_upsample_interpolates() {
        let out = resample(&[0.0, 1.0], 1, 2, 1);
        assert_eq!(out.len(), 4);
        assert!((out[1] - 0.5).abs() < 1e-6);
    }
}
