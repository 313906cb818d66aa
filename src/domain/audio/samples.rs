//! Audio Context - Value Objects

use super::AudioError;

/// 合成语音的固定采样率
pub const SPEECH_SAMPLE_RATE: u32 = 24_000;

/// 音频样本缓冲
///
/// 交错存储的归一化浮点样本（[-1, 1]），创建后不可变
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSamples {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl AudioSamples {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Result<Self, AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate(sample_rate));
        }
        if channels == 0 {
            return Err(AudioError::InvalidChannels(channels));
        }
        if samples.len() % channels as usize != 0 {
            return Err(AudioError::InvalidFrameLayout {
                samples: samples.len(),
                channels,
            });
        }

        Ok(Self {
            samples,
            sample_rate,
            channels,
        })
    }

    /// 单声道缓冲
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self, AudioError> {
        Self::new(samples, sample_rate, 1)
    }

    /// 指定帧数的静音缓冲
    pub fn silence(frames: usize, sample_rate: u32, channels: u16) -> Result<Self, AudioError> {
        Self::new(vec![0.0; frames * channels as usize], sample_rate, channels)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// 帧数（每帧包含所有声道的一个样本）
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// 时长（毫秒）
    pub fn duration_ms(&self) -> u64 {
        (self.frames() as u64 * 1000) / self.sample_rate as u64
    }

    /// 读取某一帧某一声道的样本
    pub fn sample_at(&self, frame: usize, channel: u16) -> f32 {
        self.samples[frame * self.channels as usize + channel as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_and_duration() {
        let audio = AudioSamples::new(vec![0.0; 48_000], 24_000, 2).unwrap();
        assert_eq!(audio.frames(), 24_000);
        assert_eq!(audio.duration_ms(), 1000);
    }

    #[test]
    fn test_rejects_invalid_layout() {
        assert_eq!(
            AudioSamples::new(vec![0.0; 3], 24_000, 2),
            Err(AudioError::InvalidFrameLayout {
                samples: 3,
                channels: 2
            })
        );
        assert!(AudioSamples::new(vec![], 0, 1).is_err());
        assert!(AudioSamples::new(vec![], 24_000, 0).is_err());
    }

    #[test]
    fn test_sample_at_interleaved() {
        let audio = AudioSamples::new(vec![0.1, 0.2, 0.3, 0.4], 8_000, 2).unwrap();
        assert_eq!(audio.sample_at(1, 0), 0.3);
        assert_eq!(audio.sample_at(1, 1), 0.4);
    }
}
