//! Reelcast - 短视频生成服务
//!
//! 架构:
//! - Domain: audio/, generation/
//! - Application: commands, queries, ports, pipeline
//! - Infrastructure: http, memory, worker, adapters, events

use std::sync::Arc;
use std::time::Duration;

use reelcast::application::ports::{TtsEnginePort, VideoGeneratorPort};
use reelcast::application::{GenerationDefaults, GenerationPipeline, PipelineConfig, PollerConfig};
use reelcast::config::{load_config, print_config, AppConfig};
use reelcast::domain::generation::{ApiKey, MusicLibrary, VoiceName};
use reelcast::infrastructure::adapters::{
    FakeTtsClient, FakeTtsClientConfig, FakeVideoClient, FileArtifactStorage, HttpAssetFetcher,
    HttpTtsClient, HttpTtsClientConfig, HttpVideoClient, HttpVideoClientConfig, SymphoniaDecoder,
};
use reelcast::infrastructure::events::EventPublisher;
use reelcast::infrastructure::http::{AppState, HttpServer, ServerConfig};
use reelcast::infrastructure::memory::{InMemoryCredentialStore, InMemoryGenerationStore};
use reelcast::infrastructure::worker::{
    GcWorker, GcWorkerConfig, GenerationContext, GenerationWorker, GenerationWorkerConfig,
};
use tokio::sync::mpsc;

/// 初始化日志，`RUST_LOG` 优先于配置
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},reelcast={},tower_http=debug",
        config.log.level, config.log.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

/// 创建视频与 TTS 客户端，离线模式使用 fake 实现
fn build_remote_clients(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn VideoGeneratorPort>, Arc<dyn TtsEnginePort>)> {
    let gemini = &config.gemini;

    if gemini.offline {
        let video_url = gemini
            .offline_video_url
            .clone()
            .ok_or_else(|| anyhow::anyhow!("gemini.offline_video_url is required offline"))?;
        let video: Arc<dyn VideoGeneratorPort> = Arc::new(FakeVideoClient::completed(video_url));
        let tts: Arc<dyn TtsEnginePort> = Arc::new(FakeTtsClient::new(FakeTtsClientConfig {
            sample_rate: config.generation.speech_sample_rate,
            ..Default::default()
        }));
        return Ok((video, tts));
    }

    let video: Arc<dyn VideoGeneratorPort> = Arc::new(HttpVideoClient::new(HttpVideoClientConfig {
        base_url: gemini.base_url.clone(),
        model: gemini.video_model.clone(),
        timeout_secs: gemini.timeout_secs,
    })?);
    let tts: Arc<dyn TtsEnginePort> = Arc::new(HttpTtsClient::new(
        HttpTtsClientConfig::new(gemini.base_url.clone())
            .with_model(gemini.tts_model.clone())
            .with_timeout(gemini.timeout_secs),
    )?);

    Ok((video, tts))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Reelcast - 短视频生成服务");
    print_config(&config);

    // 远程客户端与本地适配器
    let (video_generator, tts_engine) = build_remote_clients(&config)?;
    let asset_fetcher = Arc::new(HttpAssetFetcher::new(config.gemini.timeout_secs)?);
    let audio_decoder = Arc::new(SymphoniaDecoder::new());
    let storage = Arc::new(FileArtifactStorage::new(&config.storage.output_dir).await?);

    // 凭证：可由配置预置，也可通过接口选择
    let preset_key = config
        .gemini
        .api_key
        .as_deref()
        .map(ApiKey::new)
        .transpose()?;
    let credentials = Arc::new(InMemoryCredentialStore::with_key(preset_key));

    let music = Arc::new(MusicLibrary::new(config.music.tracks.clone()));

    let generation = &config.generation;
    let pipeline = Arc::new(GenerationPipeline::new(
        PipelineConfig {
            music_gain: generation.music_gain,
            poller: PollerConfig {
                poll_interval: Duration::from_secs(generation.poll_interval_secs),
                progress_interval: Duration::from_secs(generation.progress_interval_secs),
            },
        },
        video_generator,
        tts_engine,
        asset_fetcher,
        audio_decoder,
    ));

    // 创建事件发布器
    let event_publisher = EventPublisher::new().arc();

    // 创建任务队列
    let (queue_tx, queue_rx) = mpsc::channel(generation.queue_capacity);
    let store = InMemoryGenerationStore::new(queue_tx).arc();

    // 创建并启动 GenerationWorker
    let worker = GenerationWorker::new(
        GenerationWorkerConfig {
            max_concurrent: generation.max_concurrent,
        },
        queue_rx,
        GenerationContext {
            pipeline,
            store: store.clone(),
            credentials: credentials.clone(),
            storage: storage.clone(),
            event_publisher: event_publisher.clone(),
        },
    );
    tokio::spawn(worker.run());

    // 启动过期请求清理
    if config.gc.enabled {
        let gc = GcWorker::new(GcWorkerConfig::from(&config.gc), store.clone(), storage.clone());
        tokio::spawn(gc.run());
    }

    // 创建 HTTP 服务器
    let defaults = GenerationDefaults {
        voice: VoiceName::new(&generation.default_voice)?,
        resolution: generation.default_resolution.parse()?,
        aspect_ratio: generation.default_aspect_ratio.parse()?,
    };
    let state = AppState::new(store, credentials, storage, event_publisher, music, defaults);
    let server = HttpServer::new(ServerConfig::from(&config.server), state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
