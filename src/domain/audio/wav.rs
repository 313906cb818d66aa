//! WAV 编码
//!
//! 44 字节标准 RIFF/WAVE 头 + 交错 16-bit PCM

use super::AudioSamples;

/// 标准 WAV 头长度
pub const WAV_HEADER_LEN: usize = 44;

const BITS_PER_SAMPLE: u16 = 16;

/// 浮点样本量化为 i16
///
/// 正数乘 32767，负数乘 32768，向零截断，+1.0 不会溢出
pub fn quantize(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped < 0.0 {
        (clamped * 32768.0) as i16
    } else {
        (clamped * 32767.0) as i16
    }
}

/// 将样本编码为 WAV 字节
pub fn encode_wav(audio: &AudioSamples) -> Vec<u8> {
    let num_channels = audio.channels();
    let sample_rate = audio.sample_rate();
    let byte_rate = sample_rate * num_channels as u32 * (BITS_PER_SAMPLE / 8) as u32;
    let block_align = num_channels * (BITS_PER_SAMPLE / 8);

    let data_size = audio.samples().len() * 2;
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + data_size);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(file_size as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    wav.extend_from_slice(&num_channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(data_size as u32).to_le_bytes());

    for &sample in audio.samples() {
        wav.extend_from_slice(&quantize(sample).to_le_bytes());
    }

    wav
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::decode_pcm16_le;

    fn read_u32(data: &[u8], pos: usize) -> u32 {
        u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
    }

    fn read_u16(data: &[u8], pos: usize) -> u16 {
        u16::from_le_bytes([data[pos], data[pos + 1]])
    }

    #[test]
    fn test_header_layout() {
        let audio = AudioSamples::new(vec![0.0; 200], 24_000, 2).unwrap();
        let wav = encode_wav(&audio);

        assert_eq!(wav.len(), WAV_HEADER_LEN + 400);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(read_u32(&wav, 4), 36 + 400);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(read_u32(&wav, 16), 16);
        assert_eq!(read_u16(&wav, 20), 1);
        assert_eq!(read_u16(&wav, 22), 2);
        assert_eq!(read_u32(&wav, 24), 24_000);
        assert_eq!(read_u32(&wav, 28), 24_000 * 2 * 2);
        assert_eq!(read_u16(&wav, 32), 4);
        assert_eq!(read_u16(&wav, 34), 16);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(read_u32(&wav, 40), 400);
    }

    #[test]
    fn test_quantize_asymmetric() {
        assert_eq!(quantize(1.0), 32767);
        assert_eq!(quantize(-1.0), -32768);
        assert_eq!(quantize(2.5), 32767);
        assert_eq!(quantize(-3.0), -32768);
        assert_eq!(quantize(0.0), 0);
        // 向零截断
        assert_eq!(quantize(0.5), 16383);
        assert_eq!(quantize(-0.5), -16384);
    }

    #[test]
    fn test_pcm_round_trip_within_one_unit() {
        let original: Vec<i16> = vec![0, 1, -1, 100, -100, 12345, -12345, i16::MAX, i16::MIN];
        let bytes: Vec<u8> = original.iter().flat_map(|v| v.to_le_bytes()).collect();

        let audio = decode_pcm16_le(&bytes, 24_000).unwrap();
        let wav = encode_wav(&audio);

        let reencoded: Vec<i16> = wav[WAV_HEADER_LEN..]
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]))
            .collect();

        assert_eq!(reencoded.len(), original.len());
        for (orig, back) in original.iter().zip(reencoded.iter()) {
            assert!(
                (*orig as i32 - *back as i32).abs() <= 1,
                "sample {} re-encoded as {}",
                orig,
                back
            );
        }
    }

    #[test]
    fn test_deterministic() {
        let audio = AudioSamples::mono(vec![0.1, -0.2, 0.3], 24_000).unwrap();
        assert_eq!(encode_wav(&audio), encode_wav(&audio));
    }
}
