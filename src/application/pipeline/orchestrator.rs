//! Generation Pipeline - 单次生成请求的编排
//!
//! 流程:
//! 1. 有配音脚本时：并发请求 TTS 与下载背景音乐，解码、混音、编码为 WAV
//! 2. 提交视频生成，得到远程任务
//! 3. 轮询远程任务直到终态
//! 4. 附加凭证下载生成的视频

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::pipeline::{OperationPoller, PollerConfig};
use crate::application::ports::{
    AssetFetcherPort, AudioDecoderPort, FetchError, GenerationJob, GenerationState, ProgressReporter,
    TtsEnginePort, VideoGeneratorPort,
};
use crate::domain::audio::{
    decode_base64_pcm16, encode_wav, mix_voice_over, AudioSamples, MUSIC_GAIN,
};
use crate::domain::generation::{
    ApiKey, MusicTrack, SpeechRequest, VideoGenerationRequest, VoiceName,
};

/// 流程配置
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// 背景音乐增益
    pub music_gain: f32,
    /// 轮询配置
    pub poller: PollerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            music_gain: MUSIC_GAIN,
            poller: PollerConfig::default(),
        }
    }
}

/// 配音产物
#[derive(Debug, Clone)]
pub struct AudioArtifact {
    /// 最终样本（可能已混入背景音乐）
    pub samples: AudioSamples,
    /// WAV 编码结果
    pub wav: Vec<u8>,
    /// 是否混入了背景音乐
    pub mixed_with_music: bool,
}

/// 生成结果
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    /// 视频字节
    pub video: Vec<u8>,
    /// 远程视频 URI（不含凭证）
    pub video_uri: String,
    /// 配音，仅在提供脚本时存在
    pub audio: Option<AudioArtifact>,
}

/// 生成流程
pub struct GenerationPipeline {
    video_generator: Arc<dyn VideoGeneratorPort>,
    tts_engine: Arc<dyn TtsEnginePort>,
    asset_fetcher: Arc<dyn AssetFetcherPort>,
    audio_decoder: Arc<dyn AudioDecoderPort>,
    poller: OperationPoller,
    config: PipelineConfig,
}

impl GenerationPipeline {
    pub fn new(
        config: PipelineConfig,
        video_generator: Arc<dyn VideoGeneratorPort>,
        tts_engine: Arc<dyn TtsEnginePort>,
        asset_fetcher: Arc<dyn AssetFetcherPort>,
        audio_decoder: Arc<dyn AudioDecoderPort>,
    ) -> Self {
        let poller = OperationPoller::new(video_generator.clone(), config.poller.clone());
        Self {
            video_generator,
            tts_engine,
            asset_fetcher,
            audio_decoder,
            poller,
            config,
        }
    }

    /// 执行一次完整的生成
    ///
    /// 任一步骤失败即中止，不保留部分结果
    pub async fn run(
        &self,
        job: &GenerationJob,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Result<GenerationOutput, ApplicationError> {
        let credential = job
            .credential
            .as_ref()
            .ok_or(ApplicationError::MissingCredential)?;

        let audio = match job.script.as_deref() {
            Some(script) => {
                reporter.on_state(GenerationState::SynthesizingSpeech);
                let artifact = self
                    .prepare_voice_over(credential, script, &job.voice, job.music.as_ref())
                    .await?;
                tracing::info!(
                    request_id = %job.request_id,
                    duration_ms = artifact.samples.duration_ms(),
                    mixed_with_music = artifact.mixed_with_music,
                    "Voice-over ready"
                );
                Some(artifact)
            }
            None => None,
        };

        reporter.on_state(GenerationState::GeneratingVideo);
        let request =
            VideoGenerationRequest::new(job.prompt.clone(), job.resolution, job.aspect_ratio);
        let operation = self.video_generator.generate(credential, &request).await?;
        tracing::info!(
            request_id = %job.request_id,
            operation = %operation.name,
            "Video generation submitted"
        );

        reporter.on_state(GenerationState::Polling);
        let operation = self
            .poller
            .poll_until_done(credential, operation, reporter.clone())
            .await?;

        let video_uri = operation.video_uri.ok_or_else(|| {
            tracing::warn!(request_id = %job.request_id, "Operation finished without video URI");
            ApplicationError::NoResult
        })?;

        reporter.on_state(GenerationState::Downloading);
        let download_url = append_credential(&video_uri, credential)?;
        let video = self
            .asset_fetcher
            .fetch(&download_url)
            .await
            .map_err(keyed_download_error)?;
        tracing::info!(
            request_id = %job.request_id,
            video_size = video.len(),
            "Video downloaded"
        );

        Ok(GenerationOutput {
            video,
            video_uri,
            audio,
        })
    }

    /// 合成配音，并发下载背景音乐
    async fn prepare_voice_over(
        &self,
        credential: &ApiKey,
        script: &str,
        voice: &VoiceName,
        music: Option<&MusicTrack>,
    ) -> Result<AudioArtifact, ApplicationError> {
        let speech_request = SpeechRequest {
            script: script.to_string(),
            voice: voice.clone(),
        };

        let speech = async {
            self.tts_engine
                .synthesize(credential, &speech_request)
                .await
                .map_err(ApplicationError::from)
        };

        // 背景音乐来自第三方，不携带凭证，失败一律按传输错误处理
        let music_fetch = async {
            match music {
                Some(track) => {
                    tracing::debug!(track = %track.id, "Fetching background music");
                    self.asset_fetcher
                        .fetch(&track.url)
                        .await
                        .map(Some)
                        .map_err(ApplicationError::from)
                }
                None => Ok(None),
            }
        };

        // 任一侧失败立即中止另一侧
        let (speech, music_bytes) = tokio::try_join!(speech, music_fetch)?;

        let voice_samples = decode_base64_pcm16(&speech.audio_base64, speech.sample_rate)?;

        let decoder = self.audio_decoder.clone();
        let music_gain = self.config.music_gain;
        tokio::task::spawn_blocking(move || {
            render_voice_over(decoder.as_ref(), voice_samples, music_bytes, music_gain)
        })
        .await
        .map_err(|e| ApplicationError::internal(format!("audio render task failed: {}", e)))?
    }
}

/// 离线渲染配音，解码器只在本次渲染内使用
fn render_voice_over(
    decoder: &dyn AudioDecoderPort,
    voice: AudioSamples,
    music: Option<Vec<u8>>,
    music_gain: f32,
) -> Result<AudioArtifact, ApplicationError> {
    let (samples, mixed_with_music) = match music {
        Some(bytes) => {
            let music = decoder.decode(&bytes, voice.sample_rate())?;
            (mix_voice_over(&voice, Some(&music), music_gain)?, true)
        }
        None => (voice, false),
    };

    let wav = encode_wav(&samples);
    Ok(AudioArtifact {
        samples,
        wav,
        mixed_with_music,
    })
}

/// 携带凭证的视频下载被拒绝时，视为凭证失效
fn keyed_download_error(err: FetchError) -> ApplicationError {
    if err.is_credential_rejected() {
        return ApplicationError::InvalidCredential(err.to_string());
    }
    err.into()
}

/// 在视频 URI 上附加凭证参数
pub fn append_credential(uri: &str, credential: &ApiKey) -> Result<String, ApplicationError> {
    let mut url = reqwest::Url::parse(uri).map_err(|e| {
        tracing::warn!(error = %e, "Operation returned malformed video URI");
        ApplicationError::NoResult
    })?;
    url.query_pairs_mut().append_pair("key", credential.expose());
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{DecodeError, SpeechResponse, TtsError};
    use std::time::Duration;
    use crate::domain::audio::decode_pcm16_le;
    use crate::infrastructure::adapters::{FakeTtsClient, FakeTtsClientConfig, FakeVideoClient};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::domain::generation::{Operation, Prompt};

    /// 按 URL 前缀返回固定字节或状态码
    #[derive(Default)]
    struct StubFetcher {
        assets: HashMap<String, Vec<u8>>,
        rejections: HashMap<String, u16>,
        requested: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn with_asset(mut self, url: &str, data: Vec<u8>) -> Self {
            self.assets.insert(url.to_string(), data);
            self
        }

        fn with_status(mut self, url: &str, status: u16) -> Self {
            self.rejections.insert(url.to_string(), status);
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AssetFetcherPort for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            if let Some((_, status)) = self
                .rejections
                .iter()
                .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            {
                return Err(FetchError::HttpStatus {
                    status: *status,
                    url: url.to_string(),
                });
            }
            self.assets
                .iter()
                .find(|(prefix, _)| url.starts_with(prefix.as_str()))
                .map(|(_, data)| data.clone())
                .ok_or_else(|| FetchError::HttpStatus {
                    status: 404,
                    url: url.to_string(),
                })
        }
    }

    /// 永不返回的 TTS
    struct StalledTts;

    #[async_trait]
    impl TtsEnginePort for StalledTts {
        async fn synthesize(
            &self,
            _credential: &ApiKey,
            _request: &SpeechRequest,
        ) -> Result<SpeechResponse, TtsError> {
            std::future::pending().await
        }
    }

    /// 把字节当作 24kHz 16-bit PCM 的解码器
    struct RawPcmDecoder;

    impl AudioDecoderPort for RawPcmDecoder {
        fn decode(&self, data: &[u8], target: u32) -> Result<AudioSamples, DecodeError> {
            decode_pcm16_le(data, target).map_err(|e| DecodeError::DecodingError(e.to_string()))
        }
    }

    struct NullReporter {
        states: Mutex<Vec<GenerationState>>,
    }

    impl NullReporter {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                states: Mutex::new(Vec::new()),
            })
        }
    }

    impl ProgressReporter for NullReporter {
        fn on_state(&self, state: GenerationState) {
            self.states.lock().unwrap().push(state);
        }

        fn on_progress(&self, _message: &str) {}
    }

    const VIDEO_URI: &str = "https://videos.example.com/files/abc:download?alt=media";
    const MUSIC_URL: &str = "https://cdn.example.com/music/lofi.raw";

    fn video_client(final_op: Operation) -> Arc<FakeVideoClient> {
        Arc::new(FakeVideoClient::new(
            Operation::pending("operations/e2e"),
            vec![Ok(Operation::pending("operations/e2e")), Ok(final_op)],
        ))
    }

    fn pipeline(
        video: Arc<FakeVideoClient>,
        tts: Arc<FakeTtsClient>,
        fetcher: Arc<StubFetcher>,
    ) -> GenerationPipeline {
        GenerationPipeline::new(
            PipelineConfig::default(),
            video,
            tts,
            fetcher,
            Arc::new(RawPcmDecoder),
        )
    }

    fn job() -> GenerationJob {
        GenerationJob::new(Prompt::new("a cat").unwrap(), VoiceName::new("Kore").unwrap())
            .with_credential(Some(ApiKey::new("secret-key").unwrap()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_prompt_only_produces_video_without_audio() {
        let video = video_client(Operation::succeeded("operations/e2e", VIDEO_URI));
        let tts = Arc::new(FakeTtsClient::new(FakeTtsClientConfig::default()));
        let fetcher = Arc::new(StubFetcher::default().with_asset(VIDEO_URI, b"mp4-bytes".to_vec()));
        let reporter = NullReporter::new();

        let output = pipeline(video.clone(), tts.clone(), fetcher.clone())
            .run(&job(), reporter.clone())
            .await
            .unwrap();

        assert_eq!(output.video, b"mp4-bytes");
        assert_eq!(output.video_uri, VIDEO_URI);
        assert!(output.audio.is_none());
        assert_eq!(tts.calls(), 0);
        assert_eq!(video.generate_calls(), 1);

        let requested = fetcher.requested();
        assert_eq!(requested.len(), 1);
        assert!(requested[0].ends_with("&key=secret-key"));

        let states = reporter.states.lock().unwrap().clone();
        assert_eq!(
            states,
            vec![
                GenerationState::GeneratingVideo,
                GenerationState::Polling,
                GenerationState::Downloading
            ]
        );
        let sent = video.last_request().unwrap();
        assert_eq!(sent.prompt.as_str(), "a cat");
        assert_eq!(sent.number_of_videos, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_script_without_music_yields_voice_buffer() {
        let video = video_client(Operation::succeeded("operations/e2e", VIDEO_URI));
        let tts = Arc::new(FakeTtsClient::new(FakeTtsClientConfig::default()));
        let fetcher = Arc::new(StubFetcher::default().with_asset(VIDEO_URI, b"mp4".to_vec()));

        let output = pipeline(video, tts.clone(), fetcher.clone())
            .run(&job().with_script("hello"), NullReporter::new())
            .await
            .unwrap();

        let expected = decode_base64_pcm16(&tts.audio_base64(), 24_000).unwrap();
        let audio = output.audio.expect("audio artifact");
        assert_eq!(audio.samples, expected);
        assert_eq!(audio.wav, encode_wav(&expected));
        assert!(!audio.mixed_with_music);
        assert_eq!(tts.calls(), 1);
        assert_eq!(output.video, b"mp4");
        assert_eq!(fetcher.requested().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_script_with_music_is_mixed() {
        // 比配音更长的背景音乐
        let tts_config = FakeTtsClientConfig::default();
        let voice_frames = (tts_config.sample_rate as u64 * tts_config.duration_ms / 1000) as usize;
        let music_frames = voice_frames * 2;
        let music: Vec<u8> = (0..music_frames).flat_map(|_| 8192i16.to_le_bytes()).collect();

        let video = video_client(Operation::succeeded("operations/e2e", VIDEO_URI));
        let tts = Arc::new(FakeTtsClient::new(tts_config));
        let fetcher = Arc::new(
            StubFetcher::default()
                .with_asset(VIDEO_URI, b"mp4".to_vec())
                .with_asset(MUSIC_URL, music),
        );

        let job = job()
            .with_script("hello")
            .with_music(Some(MusicTrack::new("lofi", "Lo-fi", MUSIC_URL)));
        let output = pipeline(video, tts, fetcher.clone())
            .run(&job, NullReporter::new())
            .await
            .unwrap();

        let audio = output.audio.unwrap();
        assert!(audio.mixed_with_music);
        assert_eq!(audio.samples.frames(), music_frames);
        // 配音结束后只剩 0.25 * 0.2
        let tail = audio.samples.samples()[music_frames - 1];
        assert!((tail - 0.05).abs() < 1e-6);
        assert!(fetcher.requested().contains(&MUSIC_URL.to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_credential_fails_before_remote_calls() {
        let video = video_client(Operation::succeeded("operations/e2e", VIDEO_URI));
        let tts = Arc::new(FakeTtsClient::new(FakeTtsClientConfig::default()));
        let fetcher = Arc::new(StubFetcher::default());

        let job = job().with_script("hello").with_credential(None);
        let err = pipeline(video.clone(), tts.clone(), fetcher.clone())
            .run(&job, NullReporter::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::MissingCredential));
        assert_eq!(video.generate_calls(), 0);
        assert_eq!(tts.calls(), 0);
        assert!(fetcher.requested().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_music_fetch_failure_aborts_request() {
        let video = video_client(Operation::succeeded("operations/e2e", VIDEO_URI));
        let tts = Arc::new(FakeTtsClient::new(FakeTtsClientConfig::default()));
        let fetcher = Arc::new(StubFetcher::default().with_asset(VIDEO_URI, b"mp4".to_vec()));

        let job = job()
            .with_script("hello")
            .with_music(Some(MusicTrack::new("gone", "Gone", MUSIC_URL)));
        let err = pipeline(video.clone(), tts, fetcher)
            .run(&job, NullReporter::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Transport(_)));
        assert!(err.to_string().contains("404"));
        assert_eq!(video.generate_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_music_host_rejection_keeps_credential_valid() {
        let video = video_client(Operation::succeeded("operations/e2e", VIDEO_URI));
        let tts = Arc::new(FakeTtsClient::new(FakeTtsClientConfig::default()));
        let fetcher = Arc::new(
            StubFetcher::default()
                .with_asset(VIDEO_URI, b"mp4".to_vec())
                .with_status(MUSIC_URL, 403),
        );

        let job = job()
            .with_script("hello")
            .with_music(Some(MusicTrack::new("lofi", "Lo-fi", MUSIC_URL)));
        let err = pipeline(video, tts, fetcher)
            .run(&job, NullReporter::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Transport(_)));
        assert!(!err.is_credential_error());
        assert!(err.to_string().contains("HTTP 403"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_video_download_is_credential_error() {
        let video = video_client(Operation::succeeded("operations/e2e", VIDEO_URI));
        let tts = Arc::new(FakeTtsClient::new(FakeTtsClientConfig::default()));
        let fetcher = Arc::new(StubFetcher::default().with_status(VIDEO_URI, 403));

        let err = pipeline(video, tts, fetcher.clone())
            .run(&job(), NullReporter::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::InvalidCredential(_)));
        assert!(err.is_credential_error());
        assert!(err.to_string().contains("select a valid key"));
        assert_eq!(fetcher.requested().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_music_failure_does_not_wait_for_speech() {
        let video = video_client(Operation::succeeded("operations/e2e", VIDEO_URI));
        let fetcher = Arc::new(StubFetcher::default().with_status(MUSIC_URL, 500));
        let pipeline = GenerationPipeline::new(
            PipelineConfig::default(),
            video.clone(),
            Arc::new(StalledTts),
            fetcher,
            Arc::new(RawPcmDecoder),
        );

        let job = job()
            .with_script("hello")
            .with_music(Some(MusicTrack::new("lofi", "Lo-fi", MUSIC_URL)));
        let result = tokio::time::timeout(
            Duration::from_secs(60),
            pipeline.run(&job, NullReporter::new()),
        )
        .await
        .expect("music failure should abort speech synthesis");

        assert!(matches!(result, Err(ApplicationError::Transport(_))));
        assert_eq!(video.generate_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_failure_and_missing_uri() {
        let fetcher = Arc::new(StubFetcher::default());
        let tts = Arc::new(FakeTtsClient::new(FakeTtsClientConfig::default()));

        let video = video_client(Operation::failed("operations/e2e", "quota exceeded"));
        let err = pipeline(video, tts.clone(), fetcher.clone())
            .run(&job(), NullReporter::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));

        let video = video_client(Operation {
            name: "operations/e2e".to_string(),
            done: true,
            error: None,
            video_uri: None,
        });
        let err = pipeline(video, tts, fetcher.clone())
            .run(&job(), NullReporter::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NoResult));
        assert!(fetcher.requested().is_empty());
    }

    #[test]
    fn test_append_credential() {
        let key = ApiKey::new("k1").unwrap();
        assert_eq!(
            append_credential("https://x.com/v.mp4", &key).unwrap(),
            "https://x.com/v.mp4?key=k1"
        );
        assert_eq!(
            append_credential("https://x.com/v?alt=media", &key).unwrap(),
            "https://x.com/v?alt=media&key=k1"
        );
        assert!(matches!(
            append_credential("not a url", &key),
            Err(ApplicationError::NoResult)
        ));
    }
}
