//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（视频生成、TTS、下载、解码、存储、凭证等）
//! - pipeline: 单次生成请求的编排（配音、混音、视频生成、轮询、下载）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    handlers::{
        GenerationDefaults, RevokeCredentialHandler, SelectCredentialHandler,
        SubmitGenerationHandler, SubmitGenerationResponse,
    },
    RevokeCredential, SelectCredential, SubmitGeneration,
};

pub use error::ApplicationError;

pub use pipeline::{GenerationPipeline, PipelineConfig, PollerConfig};

pub use queries::{
    handlers::{
        CredentialStatusResponse, GetArtifactHandler, GetCredentialStatusHandler,
        GetGenerationHandler, ListGenerationsHandler, ListMusicHandler, ListVoicesHandler,
        VoiceEntry,
    },
    GetArtifact, GetArtifactResponse, GetCredentialStatus, GetGeneration, ListGenerations,
    ListMusic, ListVoices,
};
