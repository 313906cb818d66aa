//! Artifact Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    ArtifactKind, ArtifactStoragePort, GenerationState, GenerationStorePort,
};
use crate::application::queries::{GetArtifact, GetArtifactResponse};

/// GetArtifact Handler - 定位已完成请求的产物文件
pub struct GetArtifactHandler {
    store: Arc<dyn GenerationStorePort>,
    storage: Arc<dyn ArtifactStoragePort>,
}

impl GetArtifactHandler {
    pub fn new(store: Arc<dyn GenerationStorePort>, storage: Arc<dyn ArtifactStoragePort>) -> Self {
        Self { store, storage }
    }

    pub async fn handle(&self, query: GetArtifact) -> Result<GetArtifactResponse, ApplicationError> {
        let record = self
            .store
            .get(query.request_id)
            .ok_or_else(|| ApplicationError::not_found("Generation", query.request_id))?;

        if record.state != GenerationState::Ready {
            return Err(ApplicationError::validation(format!(
                "Generation {} is {}, artifacts are not available",
                query.request_id,
                record.state.as_str()
            )));
        }

        let available = match query.kind {
            ArtifactKind::Video => record.has_video,
            ArtifactKind::Audio => record.has_audio,
        };
        if !available || !self.storage.exists(query.request_id, query.kind).await {
            return Err(ApplicationError::not_found(
                "Artifact",
                format!("{}/{}", query.request_id, query.kind.as_str()),
            ));
        }

        Ok(GetArtifactResponse {
            path: self.storage.artifact_path(query.request_id, query.kind),
            content_type: query.kind.content_type(),
            file_name: format!(
                "{}-{}",
                &query.request_id.simple().to_string()[..8],
                query.kind.file_name()
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::GenerationJob;
    use crate::domain::generation::{Prompt, VoiceName};
    use crate::infrastructure::adapters::FileArtifactStorage;
    use crate::infrastructure::memory::InMemoryGenerationStore;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_artifact_requires_ready_state() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, _rx) = mpsc::channel(4);
        let store = InMemoryGenerationStore::new(tx).arc();
        let storage = Arc::new(FileArtifactStorage::new(dir.path()).await.unwrap());
        let handler = GetArtifactHandler::new(store.clone(), storage.clone());

        let job =
            GenerationJob::new(Prompt::new("a cat").unwrap(), VoiceName::new("Puck").unwrap());
        let request_id = store.submit(job).unwrap();

        let query = GetArtifact {
            request_id,
            kind: ArtifactKind::Video,
        };
        assert!(matches!(
            handler.handle(query.clone()).await,
            Err(ApplicationError::ValidationError(_))
        ));

        storage
            .save(request_id, ArtifactKind::Video, b"mp4")
            .await
            .unwrap();
        store.set_ready(request_id, false).unwrap();

        let response = handler.handle(query).await.unwrap();
        assert_eq!(response.content_type, "video/mp4");
        assert!(response.path.exists());
        assert!(response.file_name.ends_with("video.mp4"));

        let err = handler
            .handle(GetArtifact {
                request_id,
                kind: ArtifactKind::Audio,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }
}
