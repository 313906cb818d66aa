//! Reelcast - 短视频生成服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Audio: PCM 解码、WAV 编码、配音与背景音乐混音
//! - Generation: 提示词、音色、分辨率、远程任务、凭证
//!
//! 应用层 (application/):
//! - Ports: 端口定义（VideoGenerator, TtsEngine, AssetFetcher, AudioDecoder, Storage, Credential）
//! - Pipeline: 单次生成的编排与远程任务轮询
//! - Commands / Queries: CQRS 处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + WebSocket
//! - Memory: 生成请求与凭证的内存实现
//! - Worker: GenerationWorker 后台任务处理
//! - Adapters: 视频/TTS 客户端、下载、解码、产物存储
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
