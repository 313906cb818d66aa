//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Audio Context: PCM 解码、WAV 编码、配音与背景音乐混音
//! - Generation Context: 视频生成请求、远程任务（Operation）、凭证、进度文案

pub mod audio;
pub mod generation;
