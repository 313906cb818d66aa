//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod artifact_storage;
mod asset_fetcher;
mod audio_decoder;
mod credential_store;
mod generation_store;
mod progress_reporter;
mod tts_engine;
mod video_generator;

pub use artifact_storage::{ArtifactKind, ArtifactStoragePort, StorageError};
pub use asset_fetcher::{AssetFetcherPort, FetchError};
pub use audio_decoder::{AudioDecoderPort, DecodeError};
pub use credential_store::CredentialStorePort;
pub use generation_store::{
    GenerationJob, GenerationRecord, GenerationState, GenerationStoreError, GenerationStorePort,
};
pub use progress_reporter::ProgressReporter;
pub use tts_engine::{SpeechResponse, TtsEnginePort, TtsError};
pub use video_generator::{VideoError, VideoGeneratorPort};
