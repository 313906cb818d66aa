//! Generation Command Handlers

use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::SubmitGeneration;
use crate::application::error::ApplicationError;
use crate::application::ports::{CredentialStorePort, GenerationJob, GenerationStorePort};
use crate::domain::generation::{AspectRatio, MusicLibrary, Prompt, Resolution, VoiceName};

/// 提交请求时的默认参数
#[derive(Debug, Clone)]
pub struct GenerationDefaults {
    pub voice: VoiceName,
    pub resolution: Resolution,
    pub aspect_ratio: AspectRatio,
}

/// 提交响应
#[derive(Debug, Clone)]
pub struct SubmitGenerationResponse {
    pub request_id: Uuid,
}

/// SubmitGeneration Handler
pub struct SubmitGenerationHandler {
    store: Arc<dyn GenerationStorePort>,
    credentials: Arc<dyn CredentialStorePort>,
    music: Arc<MusicLibrary>,
    defaults: GenerationDefaults,
}

impl SubmitGenerationHandler {
    pub fn new(
        store: Arc<dyn GenerationStorePort>,
        credentials: Arc<dyn CredentialStorePort>,
        music: Arc<MusicLibrary>,
        defaults: GenerationDefaults,
    ) -> Self {
        Self {
            store,
            credentials,
            music,
            defaults,
        }
    }

    pub fn handle(
        &self,
        command: SubmitGeneration,
    ) -> Result<SubmitGenerationResponse, ApplicationError> {
        let prompt = Prompt::new(command.prompt)?;

        let voice = match command.voice.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => VoiceName::new(name)?,
            _ => self.defaults.voice.clone(),
        };
        let resolution = match command.resolution.as_deref() {
            Some(r) => r.parse()?,
            None => self.defaults.resolution,
        };
        let aspect_ratio = match command.aspect_ratio.as_deref() {
            Some(a) => a.parse()?,
            None => self.defaults.aspect_ratio,
        };

        let music = match command.music_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Some(
                self.music
                    .find(id)
                    .cloned()
                    .ok_or_else(|| ApplicationError::not_found("Music", id))?,
            ),
            _ => None,
        };

        let credential = self
            .credentials
            .current()
            .ok_or(ApplicationError::MissingCredential)?;

        let mut job = GenerationJob::new(prompt, voice)
            .with_music(music)
            .with_credential(Some(credential));
        if let Some(script) = command.script {
            job = job.with_script(script);
        }
        job.resolution = resolution;
        job.aspect_ratio = aspect_ratio;

        let has_script = job.script.is_some();
        let request_id = self.store.submit(job)?;

        tracing::info!(
            request_id = %request_id,
            has_script = has_script,
            music = ?command.music_id,
            resolution = resolution.as_str(),
            aspect_ratio = aspect_ratio.as_str(),
            "Generation submitted"
        );

        Ok(SubmitGenerationResponse { request_id })
    }
}
