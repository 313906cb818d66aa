//! GC Worker - 定期清理过期的生成请求
//!
//! 终态请求超过保留期后，删除其产物目录并移除内存记录

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::application::ports::{ArtifactStoragePort, GenerationStorePort};

/// GC 配置
#[derive(Debug, Clone)]
pub struct GcWorkerConfig {
    /// 清理间隔
    pub interval: Duration,
    /// 终态请求保留时间
    pub retention: chrono::Duration,
}

impl Default for GcWorkerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(600),
            retention: chrono::Duration::hours(24),
        }
    }
}

impl From<&crate::config::GcConfig> for GcWorkerConfig {
    fn from(config: &crate::config::GcConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_secs),
            retention: chrono::Duration::seconds(config.retention_secs as i64),
        }
    }
}

pub struct GcWorker {
    config: GcWorkerConfig,
    store: Arc<dyn GenerationStorePort>,
    storage: Arc<dyn ArtifactStoragePort>,
}

impl GcWorker {
    pub fn new(
        config: GcWorkerConfig,
        store: Arc<dyn GenerationStorePort>,
        storage: Arc<dyn ArtifactStoragePort>,
    ) -> Self {
        Self {
            config,
            store,
            storage,
        }
    }

    /// 启动 GC 循环
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            retention_secs = self.config.retention.num_seconds(),
            "GcWorker started"
        );

        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // 第一次 tick 立即返回，跳过启动时的清理
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.sweep().await;
        }
    }

    /// 执行一次清理，返回移除的请求数
    pub async fn sweep(&self) -> usize {
        let mut removed = 0;

        for request_id in self.store.expired(self.config.retention) {
            // 产物删除失败时保留记录，下一轮重试
            if let Err(e) = self.storage.delete_request(request_id).await {
                tracing::warn!(request_id = %request_id, error = %e, "Failed to delete expired artifacts");
                continue;
            }
            if self.store.remove(request_id).is_some() {
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::info!(removed, "GC sweep completed");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{ArtifactKind, GenerationJob, GenerationState};
    use crate::domain::generation::{Prompt, VoiceName};
    use crate::infrastructure::adapters::FileArtifactStorage;
    use crate::infrastructure::memory::InMemoryGenerationStore;
    use tokio::sync::mpsc;
    use uuid::Uuid;

    fn job() -> GenerationJob {
        GenerationJob::new(Prompt::new("a cat").unwrap(), VoiceName::new("Kore").unwrap())
    }

    #[tokio::test]
    async fn test_sweep_removes_expired_records_and_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, _rx) = mpsc::channel::<Uuid>(16);
        let store = InMemoryGenerationStore::new(tx).arc();
        let storage = Arc::new(FileArtifactStorage::new(dir.path()).await.unwrap());

        let done = store.submit(job()).unwrap();
        storage
            .save(done, ArtifactKind::Video, b"mp4")
            .await
            .unwrap();
        store.set_ready(done, false).unwrap();

        let failed = store.submit(job()).unwrap();
        store.set_failed(failed, "boom".to_string()).unwrap();

        let running = store.submit(job()).unwrap();
        store.set_state(running, GenerationState::Polling).unwrap();

        let keep_all = GcWorker::new(
            GcWorkerConfig {
                interval: Duration::from_secs(60),
                retention: chrono::Duration::hours(1),
            },
            store.clone(),
            storage.clone(),
        );
        assert_eq!(keep_all.sweep().await, 0);
        assert!(storage.exists(done, ArtifactKind::Video).await);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let gc = GcWorker::new(
            GcWorkerConfig {
                interval: Duration::from_secs(60),
                retention: chrono::Duration::milliseconds(5),
            },
            store.clone(),
            storage.clone(),
        );
        assert_eq!(gc.sweep().await, 2);

        assert!(store.get(done).is_none());
        assert!(store.get(failed).is_none());
        assert!(!storage.exists(done, ArtifactKind::Video).await);
        assert!(!dir.path().join(done.to_string()).exists());

        // 未结束的请求不受影响
        assert_eq!(store.get(running).unwrap().state, GenerationState::Polling);
        assert_eq!(gc.sweep().await, 0);
    }

    #[test]
    fn test_config_from_app_config() {
        let config = GcWorkerConfig::from(&crate::config::GcConfig::default());
        assert_eq!(config.interval, Duration::from_secs(600));
        assert_eq!(config.retention, chrono::Duration::hours(24));
    }
}
