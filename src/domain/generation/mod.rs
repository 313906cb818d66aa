//! Generation Context - 视频生成限界上下文
//!
//! 职责:
//! - 视频/语音生成请求的值对象
//! - 远程长任务（Operation）及其轮询状态
//! - API 凭证
//! - 轮询期间的进度文案

mod credential;
mod errors;
mod music;
mod operation;
mod progress;
mod request;

pub use credential::ApiKey;
pub use errors::GenerationError;
pub use music::{MusicLibrary, MusicTrack};
pub use operation::{Operation, OperationError, PollState};
pub use progress::{ProgressMessages, PROGRESS_MESSAGES};
pub use request::{
    AspectRatio, Prompt, Resolution, SpeechRequest, VideoGenerationRequest, VoiceName,
    PREBUILT_VOICES,
};
