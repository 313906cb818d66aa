//! Audio Context - 音频限界上下文
//!
//! 职责:
//! - base64 / 16-bit PCM 解码为归一化浮点样本
//! - 浮点样本编码为 WAV 容器
//! - 配音与背景音乐的离线混音

mod errors;
mod mixer;
mod pcm;
mod samples;
mod wav;

pub use errors::AudioError;
pub use mixer::{mix_voice_over, MUSIC_GAIN, VOICE_GAIN};
pub use pcm::{decode_base64_pcm16, decode_pcm16_le};
pub use samples::{AudioSamples, SPEECH_SAMPLE_RATE};
pub use wav::{encode_wav, quantize, WAV_HEADER_LEN};
