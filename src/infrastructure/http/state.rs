//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    GenerationDefaults, RevokeCredentialHandler, SelectCredentialHandler,
    SubmitGenerationHandler,
    // Query handlers
    GetArtifactHandler, GetCredentialStatusHandler, GetGenerationHandler,
    ListGenerationsHandler, ListMusicHandler, ListVoicesHandler,
    // Ports
    ports::{ArtifactStoragePort, CredentialStorePort, GenerationStorePort},
};
use crate::domain::generation::MusicLibrary;
use crate::infrastructure::events::EventPublisher;

/// 应用状态
///
/// 生成请求与凭证均为内存实现，产物落盘
pub struct AppState {
    // ========== Ports ==========
    pub store: Arc<dyn GenerationStorePort>,
    pub event_publisher: Arc<EventPublisher>,

    // ========== Command Handlers ==========
    pub submit_generation_handler: SubmitGenerationHandler,
    pub select_credential_handler: SelectCredentialHandler,
    pub revoke_credential_handler: RevokeCredentialHandler,

    // ========== Query Handlers ==========
    pub get_generation_handler: GetGenerationHandler,
    pub list_generations_handler: ListGenerationsHandler,
    pub get_credential_status_handler: GetCredentialStatusHandler,
    pub get_artifact_handler: GetArtifactHandler,
    pub list_voices_handler: ListVoicesHandler,
    pub list_music_handler: ListMusicHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        store: Arc<dyn GenerationStorePort>,
        credentials: Arc<dyn CredentialStorePort>,
        storage: Arc<dyn ArtifactStoragePort>,
        event_publisher: Arc<EventPublisher>,
        music: Arc<MusicLibrary>,
        defaults: GenerationDefaults,
    ) -> Self {
        let default_voice = defaults.voice.as_str().to_string();

        Self {
            // Command handlers
            submit_generation_handler: SubmitGenerationHandler::new(
                store.clone(),
                credentials.clone(),
                music.clone(),
                defaults,
            ),
            select_credential_handler: SelectCredentialHandler::new(credentials.clone()),
            revoke_credential_handler: RevokeCredentialHandler::new(credentials.clone()),

            // Query handlers
            get_generation_handler: GetGenerationHandler::new(store.clone()),
            list_generations_handler: ListGenerationsHandler::new(store.clone()),
            get_credential_status_handler: GetCredentialStatusHandler::new(credentials),
            get_artifact_handler: GetArtifactHandler::new(store.clone(), storage),
            list_voices_handler: ListVoicesHandler::new(default_voice),
            list_music_handler: ListMusicHandler::new(music),

            // Ports
            store,
            event_publisher,
        }
    }
}
