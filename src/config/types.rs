//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::generation::MusicTrack;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 远程生成服务配置
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// 生成流程配置
    #[serde(default)]
    pub generation: GenerationConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 背景音乐配置
    #[serde(default)]
    pub music: MusicConfig,

    /// 过期请求清理配置
    #[serde(default)]
    pub gc: GcConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL（用于生成产物链接）
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,

    /// 静态文件服务配置
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// 静态文件服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// 是否启用静态文件服务
    #[serde(default)]
    pub enabled: bool,

    /// 静态文件目录
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,

    /// URL 路径前缀（如 "/" 表示根路径托管）
    #[serde(default = "default_static_path")]
    pub path: String,
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("web")
}

fn default_static_path() -> String {
    "/".to_string()
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_static_dir(),
            path: default_static_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }
}

/// 远程生成服务（视频 + TTS）配置
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    /// API 基础 URL
    #[serde(default = "default_gemini_url")]
    pub base_url: String,

    /// 启动时预置的 API Key，不设置则需要通过接口选择
    #[serde(default)]
    pub api_key: Option<String>,

    /// 视频模型
    #[serde(default = "default_video_model")]
    pub video_model: String,

    /// TTS 模型
    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    /// 单次请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// 使用本地 fake 客户端（离线调试）
    #[serde(default)]
    pub offline: bool,

    /// 离线模式下 fake 视频任务返回的下载地址
    #[serde(default)]
    pub offline_video_url: Option<String>,
}

fn default_gemini_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_video_model() -> String {
    "veo-3.0-fast-generate-preview".to_string()
}

fn default_tts_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_gemini_url(),
            api_key: None,
            video_model: default_video_model(),
            tts_model: default_tts_model(),
            timeout_secs: default_timeout(),
            offline: false,
            offline_video_url: None,
        }
    }
}

/// 生成流程配置
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// 远程任务状态刷新间隔（秒）
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// 进度文案切换间隔（秒）
    #[serde(default = "default_progress_interval")]
    pub progress_interval_secs: u64,

    /// 背景音乐增益
    #[serde(default = "default_music_gain")]
    pub music_gain: f32,

    /// 离线 fake TTS 的采样率，真实采样率以 TTS 返回的 mimeType 为准
    #[serde(default = "default_speech_sample_rate")]
    pub speech_sample_rate: u32,

    #[serde(default = "default_voice")]
    pub default_voice: String,

    #[serde(default = "default_resolution")]
    pub default_resolution: String,

    #[serde(default = "default_aspect_ratio")]
    pub default_aspect_ratio: String,

    /// 最大并发生成数
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// 等待队列长度
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_poll_interval() -> u64 {
    10
}

fn default_progress_interval() -> u64 {
    5
}

fn default_music_gain() -> f32 {
    0.2
}

fn default_speech_sample_rate() -> u32 {
    24000
}

fn default_voice() -> String {
    "Kore".to_string()
}

fn default_resolution() -> String {
    "720p".to_string()
}

fn default_aspect_ratio() -> String {
    "9:16".to_string()
}

fn default_max_concurrent() -> usize {
    2
}

fn default_queue_capacity() -> usize {
    64
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            progress_interval_secs: default_progress_interval(),
            music_gain: default_music_gain(),
            speech_sample_rate: default_speech_sample_rate(),
            default_voice: default_voice(),
            default_resolution: default_resolution(),
            default_aspect_ratio: default_aspect_ratio(),
            max_concurrent: default_max_concurrent(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 产物输出目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/output")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// GC 配置
///
/// 定期清理已结束且超过保留期的请求记录及其产物
#[derive(Debug, Clone, Deserialize)]
pub struct GcConfig {
    /// 是否启用自动 GC
    #[serde(default = "default_gc_enabled")]
    pub enabled: bool,

    /// GC 间隔时间（秒）
    #[serde(default = "default_gc_interval")]
    pub interval_secs: u64,

    /// 终态请求保留时间（秒）
    #[serde(default = "default_retention")]
    pub retention_secs: u64,
}

fn default_gc_enabled() -> bool {
    true
}

fn default_gc_interval() -> u64 {
    600 // 10 分钟
}

fn default_retention() -> u64 {
    86400 // 24 小时
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            enabled: default_gc_enabled(),
            interval_secs: default_gc_interval(),
            retention_secs: default_retention(),
        }
    }
}

/// 背景音乐配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MusicConfig {
    #[serde(default)]
    pub tracks: Vec<MusicTrack>,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
