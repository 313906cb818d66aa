//! Generation Worker - Background Generation Processor

use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::application::pipeline::{GenerationOutput, GenerationPipeline};
use crate::application::ports::{
    ArtifactKind, ArtifactStoragePort, CredentialStorePort, GenerationJob, GenerationState,
    GenerationStorePort, ProgressReporter,
};
use crate::application::ApplicationError;
use crate::infrastructure::events::EventPublisher;

/// Worker 配置
#[derive(Debug, Clone)]
pub struct GenerationWorkerConfig {
    /// 最大并发生成数
    pub max_concurrent: usize,
}

impl Default for GenerationWorkerConfig {
    fn default() -> Self {
        Self { max_concurrent: 2 }
    }
}

/// 处理单个请求所需的依赖
#[derive(Clone)]
pub struct GenerationContext {
    pub pipeline: Arc<GenerationPipeline>,
    pub store: Arc<dyn GenerationStorePort>,
    pub credentials: Arc<dyn CredentialStorePort>,
    pub storage: Arc<dyn ArtifactStoragePort>,
    pub event_publisher: Arc<EventPublisher>,
}

/// 把流程回调同步到 store 和 WebSocket
struct StoreReporter {
    request_id: Uuid,
    store: Arc<dyn GenerationStorePort>,
    event_publisher: Arc<EventPublisher>,
}

impl ProgressReporter for StoreReporter {
    fn on_state(&self, state: GenerationState) {
        if let Err(e) = self.store.set_state(self.request_id, state) {
            tracing::warn!(request_id = %self.request_id, error = %e, "Failed to update state");
        }
        self.event_publisher.publish_state(self.request_id, state);
    }

    fn on_progress(&self, message: &str) {
        if let Err(e) = self.store.set_progress(self.request_id, message) {
            tracing::debug!(request_id = %self.request_id, error = %e, "Failed to update progress");
        }
        self.event_publisher.publish_progress(self.request_id, message);
    }
}

/// 生成 Worker
///
/// 后台任务处理器，从队列消费请求并执行生成流程
pub struct GenerationWorker {
    config: GenerationWorkerConfig,
    queue_receiver: mpsc::Receiver<Uuid>,
    context: GenerationContext,
}

impl GenerationWorker {
    pub fn new(
        config: GenerationWorkerConfig,
        queue_receiver: mpsc::Receiver<Uuid>,
        context: GenerationContext,
    ) -> Self {
        Self {
            config,
            queue_receiver,
            context,
        }
    }

    /// 启动 Worker
    pub async fn run(mut self) {
        tracing::info!(
            max_concurrent = self.config.max_concurrent,
            "GenerationWorker started"
        );

        // 使用 semaphore 控制并发
        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.config.max_concurrent));

        while let Some(request_id) = self.queue_receiver.recv().await {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(p) => p,
                Err(_) => {
                    tracing::error!("Failed to acquire semaphore permit");
                    continue;
                }
            };

            let context = self.context.clone();
            tokio::spawn(async move {
                let _permit = permit; // 持有 permit 直到任务完成
                Self::process_request(request_id, &context).await;
            });
        }

        tracing::info!("GenerationWorker stopped");
    }

    /// 处理单个请求
    pub async fn process_request(request_id: Uuid, context: &GenerationContext) {
        let job = match context.store.take_job(request_id) {
            Some(job) => job,
            None => {
                tracing::warn!(request_id = %request_id, "Generation job not found, skipping");
                return;
            }
        };

        let reporter = Arc::new(StoreReporter {
            request_id,
            store: context.store.clone(),
            event_publisher: context.event_publisher.clone(),
        });

        let result = match context.pipeline.run(&job, reporter).await {
            Ok(output) => Self::persist(&job, output, context).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(has_audio) => {
                if let Err(e) = context.store.set_ready(request_id, has_audio) {
                    tracing::error!(request_id = %request_id, error = %e, "Failed to mark ready");
                }
                context.event_publisher.publish_ready(request_id, has_audio);
                tracing::info!(request_id = %request_id, has_audio = has_audio, "Generation completed");
            }
            Err(e) => Self::fail(&job, e, context).await,
        }

        context.event_publisher.close(request_id);
    }

    /// 保存产物，返回是否包含配音
    async fn persist(
        job: &GenerationJob,
        output: GenerationOutput,
        context: &GenerationContext,
    ) -> Result<bool, ApplicationError> {
        context
            .storage
            .save(job.request_id, ArtifactKind::Video, &output.video)
            .await?;

        if let Some(audio) = &output.audio {
            context
                .storage
                .save(job.request_id, ArtifactKind::Audio, &audio.wav)
                .await?;
        }

        Ok(output.audio.is_some())
    }

    async fn fail(job: &GenerationJob, error: ApplicationError, context: &GenerationContext) {
        let request_id = job.request_id;

        // 不保留部分产物
        if let Err(e) = context.storage.delete_request(request_id).await {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to clean up artifacts");
        }

        // 只撤销本次请求使用的 Key，用户可能已经换了新 Key
        let revoked = error.is_credential_error() && {
            let current = context.credentials.current();
            let used = job.credential.as_ref();
            match (current, used) {
                (Some(current), Some(used)) if current.expose() == used.expose() => {
                    context.credentials.revoke();
                    true
                }
                _ => false,
            }
        };

        let message = error.to_string();
        tracing::error!(
            request_id = %request_id,
            error = %message,
            credential_revoked = revoked,
            "Generation failed"
        );

        if let Err(e) = context.store.set_failed(request_id, message.clone()) {
            tracing::error!(request_id = %request_id, error = %e, "Failed to mark failed");
        }
        context
            .event_publisher
            .publish_failed(request_id, &message, revoked);
    }
}
