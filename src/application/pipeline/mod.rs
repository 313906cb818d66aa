//! 生成流程编排
//!
//! - poller: 远程长任务轮询（固定间隔刷新 + 独立的进度文案定时器）
//! - orchestrator: 配音合成、背景音乐、混音、视频生成、轮询、下载的完整流程

mod orchestrator;
mod poller;

pub use orchestrator::{
    append_credential, AudioArtifact, GenerationOutput, GenerationPipeline, PipelineConfig,
};
pub use poller::{OperationPoller, PollError, PollerConfig};
