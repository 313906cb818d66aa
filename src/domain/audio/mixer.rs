//! 配音混音
//!
//! 离线渲染：配音全增益叠加，背景音乐衰减后叠加，输出长度取两者较长者

use super::{AudioError, AudioSamples};

/// 配音增益
pub const VOICE_GAIN: f32 = 1.0;

/// 背景音乐默认增益，保证对白可听清
pub const MUSIC_GAIN: f32 = 0.2;

/// 混合配音与可选的背景音乐
///
/// - 没有背景音乐时原样返回配音
/// - 输出采用配音的采样率和声道数
/// - 背景音乐声道数不同时按扬声器规则上/下混
/// - 叠加结果限幅到 [-1, 1]
pub fn mix_voice_over(
    voice: &AudioSamples,
    music: Option<&AudioSamples>,
    music_gain: f32,
) -> Result<AudioSamples, AudioError> {
    let music = match music {
        Some(music) => music,
        None => return Ok(voice.clone()),
    };

    if music.sample_rate() != voice.sample_rate() {
        return Err(AudioError::SampleRateMismatch {
            voice: voice.sample_rate(),
            music: music.sample_rate(),
        });
    }

    let channels = voice.channels();
    let frames = voice.frames().max(music.frames());
    let mut output = vec![0.0f32; frames * channels as usize];

    for (out, &sample) in output.iter_mut().zip(voice.samples()) {
        *out += sample * VOICE_GAIN;
    }

    for frame in 0..music.frames() {
        for channel in 0..channels {
            let idx = frame * channels as usize + channel as usize;
            output[idx] += music_sample(music, frame, channel, channels) * music_gain;
        }
    }

    for sample in output.iter_mut() {
        *sample = sample.clamp(-1.0, 1.0);
    }

    AudioSamples::new(output, voice.sample_rate(), channels)
}

/// 按目标声道布局读取背景音乐样本
fn music_sample(music: &AudioSamples, frame: usize, channel: u16, out_channels: u16) -> f32 {
    let music_channels = music.channels();

    if music_channels == out_channels {
        music.sample_at(frame, channel)
    } else if music_channels == 1 {
        music.sample_at(frame, 0)
    } else if out_channels == 1 {
        let sum: f32 = (0..music_channels).map(|c| music.sample_at(frame, c)).sum();
        sum / music_channels as f32
    } else {
        music.sample_at(frame, channel % music_channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| (i as f32 / len as f32) - 0.5).collect()
    }

    #[test]
    fn test_without_music_returns_voice() {
        let voice = AudioSamples::mono(ramp(100), 24_000).unwrap();
        let mixed = mix_voice_over(&voice, None, MUSIC_GAIN).unwrap();
        assert_eq!(mixed, voice);
    }

    #[test]
    fn test_silent_music_keeps_voice_at_unity() {
        let voice = AudioSamples::mono(ramp(480), 24_000).unwrap();
        let music = AudioSamples::silence(480, 24_000, 1).unwrap();

        let mixed = mix_voice_over(&voice, Some(&music), MUSIC_GAIN).unwrap();
        assert_eq!(mixed.samples(), voice.samples());
    }

    #[test]
    fn test_length_is_max_of_inputs() {
        let short_voice = AudioSamples::mono(ramp(100), 24_000).unwrap();
        let long_music = AudioSamples::mono(vec![0.5; 300], 24_000).unwrap();
        let mixed = mix_voice_over(&short_voice, Some(&long_music), MUSIC_GAIN).unwrap();
        assert_eq!(mixed.frames(), 300);
        // 配音结束后只剩衰减后的背景音乐
        assert!((mixed.samples()[250] - 0.1).abs() < 1e-6);

        let long_voice = AudioSamples::mono(ramp(500), 24_000).unwrap();
        let short_music = AudioSamples::mono(vec![0.5; 50], 24_000).unwrap();
        let mixed = mix_voice_over(&long_voice, Some(&short_music), MUSIC_GAIN).unwrap();
        assert_eq!(mixed.frames(), 500);
        assert_eq!(mixed.samples()[400], long_voice.samples()[400]);
    }

    #[test]
    fn test_music_attenuated() {
        let voice = AudioSamples::mono(vec![0.25; 10], 24_000).unwrap();
        let music = AudioSamples::mono(vec![1.0; 10], 24_000).unwrap();
        let mixed = mix_voice_over(&voice, Some(&music), MUSIC_GAIN).unwrap();
        for &s in mixed.samples() {
            assert!((s - 0.45).abs() < 1e-6);
        }
    }

    #[test]
    fn test_loud_mix_is_clamped() {
        let voice = AudioSamples::mono(vec![1.0, -1.0, 0.9], 24_000).unwrap();
        let music = AudioSamples::mono(vec![1.0, -1.0, 1.0], 24_000).unwrap();
        let mixed = mix_voice_over(&voice, Some(&music), MUSIC_GAIN).unwrap();
        assert_eq!(mixed.samples(), &[1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_stereo_music_downmixed_to_mono_voice() {
        let voice = AudioSamples::mono(vec![0.0; 4], 24_000).unwrap();
        let music = AudioSamples::new(vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0], 24_000, 2)
            .unwrap();
        let mixed = mix_voice_over(&voice, Some(&music), 1.0).unwrap();
        assert_eq!(mixed.channels(), 1);
        assert_eq!(mixed.samples(), &[0.5, 0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_sample_rate_mismatch() {
        let voice = AudioSamples::mono(vec![0.0; 4], 24_000).unwrap();
        let music = AudioSamples::mono(vec![0.0; 4], 44_100).unwrap();
        assert_eq!(
            mix_voice_over(&voice, Some(&music), MUSIC_GAIN),
            Err(AudioError::SampleRateMismatch {
                voice: 24_000,
                music: 44_100
            })
        );
    }

    #[test]
    fn test_deterministic_output() {
        let voice = AudioSamples::mono(ramp(1000), 24_000).unwrap();
        let music = AudioSamples::mono(ramp(1500), 24_000).unwrap();
        let a = mix_voice_over(&voice, Some(&music), MUSIC_GAIN).unwrap();
        let b = mix_voice_over(&voice, Some(&music), MUSIC_GAIN).unwrap();
        let a_bits: Vec<u32> = a.samples().iter().map(|s| s.to_bits()).collect();
        let b_bits: Vec<u32> = b.samples().iter().map(|s| s.to_bits()).collect();
        assert_eq!(a_bits, b_bits);
    }
}
