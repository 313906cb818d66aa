//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;
use crate::domain::generation::{AspectRatio, Resolution, VoiceName};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// # 环境变量示例
/// - `REELCAST_SERVER__PORT=8080`
/// - `REELCAST_GEMINI__API_KEY=...`
/// - `REELCAST_GENERATION__POLL_INTERVAL_SECS=5`
/// - `REELCAST_STORAGE__OUTPUT_DIR=/data/output`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5080)?
        .set_default("gemini.base_url", "https://generativelanguage.googleapis.com")?
        .set_default("gemini.video_model", "veo-3.0-fast-generate-preview")?
        .set_default("gemini.tts_model", "gemini-2.5-flash-preview-tts")?
        .set_default("gemini.timeout_secs", 120)?
        .set_default("gemini.offline", false)?
        .set_default("generation.poll_interval_secs", 10)?
        .set_default("generation.progress_interval_secs", 5)?
        .set_default("generation.music_gain", 0.2)?
        .set_default("generation.speech_sample_rate", 24000)?
        .set_default("generation.default_voice", "Kore")?
        .set_default("generation.default_resolution", "720p")?
        .set_default("generation.default_aspect_ratio", "9:16")?
        .set_default("generation.max_concurrent", 2)?
        .set_default("generation.queue_capacity", 64)?
        .set_default("storage.output_dir", "data/output")?
        .set_default("gc.enabled", true)?
        .set_default("gc.interval_secs", 600)?
        .set_default("gc.retention_secs", 86400)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: REELCAST_GEMINI__BASE_URL=http://localhost:9000
    builder = builder.add_source(
        Environment::with_prefix("REELCAST")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let invalid = |msg: &str| Err(ConfigError::ValidationError(msg.to_string()));

    if config.server.port == 0 {
        return invalid("Server port cannot be 0");
    }

    if config.gemini.base_url.trim().is_empty() {
        return invalid("Gemini base URL cannot be empty");
    }

    if config.gemini.offline
        && config
            .gemini
            .offline_video_url
            .as_deref()
            .map_or(true, |url| url.trim().is_empty())
    {
        return invalid("Offline mode requires gemini.offline_video_url");
    }

    let generation = &config.generation;
    if generation.poll_interval_secs == 0 || generation.progress_interval_secs == 0 {
        return invalid("Poll and progress intervals must be greater than 0");
    }

    if !(0.0..=1.0).contains(&generation.music_gain) {
        return invalid("Music gain must be within [0, 1]");
    }

    if generation.speech_sample_rate == 0 {
        return invalid("Speech sample rate cannot be 0");
    }

    if generation.max_concurrent == 0 || generation.queue_capacity == 0 {
        return invalid("Concurrency and queue capacity must be greater than 0");
    }

    if config.gc.enabled && (config.gc.interval_secs == 0 || config.gc.retention_secs == 0) {
        return invalid("GC interval and retention must be greater than 0");
    }

    VoiceName::new(&generation.default_voice)
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    generation
        .default_resolution
        .parse::<Resolution>()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    generation
        .default_aspect_ratio
        .parse::<AspectRatio>()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

    let mut ids = std::collections::HashSet::new();
    for track in &config.music.tracks {
        if !ids.insert(track.id.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Duplicate music track id: {}",
                track.id
            )));
        }
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    if config.server.static_files.enabled {
        tracing::info!("Static Files: {:?}", config.server.static_files.dir);
    }
    tracing::info!("Gemini URL: {}", config.gemini.base_url);
    tracing::info!(
        "Models: video={}, tts={}",
        config.gemini.video_model,
        config.gemini.tts_model
    );
    tracing::info!(
        "API Key: {}",
        if config.gemini.api_key.is_some() {
            "preset (redacted)"
        } else {
            "not set"
        }
    );
    if config.gemini.offline {
        tracing::warn!("Offline mode: using fake video and TTS clients");
    }
    tracing::info!(
        "Polling: every {}s, progress every {}s",
        config.generation.poll_interval_secs,
        config.generation.progress_interval_secs
    );
    tracing::info!("Music Gain: {}", config.generation.music_gain);
    tracing::info!("Music Tracks: {}", config.music.tracks.len());
    tracing::info!("Max Concurrent: {}", config.generation.max_concurrent);
    tracing::info!("Output Directory: {:?}", config.storage.output_dir);
    tracing::info!("GC Enabled: {}", config.gc.enabled);
    if config.gc.enabled {
        tracing::info!("GC Interval: {}s", config.gc.interval_secs);
        tracing::info!("Retention: {}s", config.gc.retention_secs);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
