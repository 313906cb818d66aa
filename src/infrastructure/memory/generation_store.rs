//! In-Memory Generation Store Implementation

use chrono::{Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::application::ports::{
    GenerationJob, GenerationRecord, GenerationState, GenerationStoreError, GenerationStorePort,
};

/// 内存生成请求存储
pub struct InMemoryGenerationStore {
    /// request_id -> GenerationRecord
    records: DashMap<Uuid, GenerationRecord>,
    /// request_id -> 待执行任务（worker 取走后移除）
    jobs: DashMap<Uuid, GenerationJob>,
    /// 任务队列发送端
    queue_sender: mpsc::Sender<Uuid>,
}

impl InMemoryGenerationStore {
    pub fn new(queue_sender: mpsc::Sender<Uuid>) -> Self {
        Self {
            records: DashMap::new(),
            jobs: DashMap::new(),
            queue_sender,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn update<F>(&self, request_id: Uuid, f: F) -> Result<(), GenerationStoreError>
    where
        F: FnOnce(&mut GenerationRecord),
    {
        let mut record = self
            .records
            .get_mut(&request_id)
            .ok_or(GenerationStoreError::NotFound(request_id))?;

        if record.state.is_terminal() {
            return Err(GenerationStoreError::InvalidStateTransition(format!(
                "{} is already {}",
                request_id,
                record.state.as_str()
            )));
        }

        f(record.value_mut());
        Ok(())
    }
}

impl GenerationStorePort for InMemoryGenerationStore {
    fn submit(&self, job: GenerationJob) -> Result<Uuid, GenerationStoreError> {
        let request_id = job.request_id;
        if self.records.contains_key(&request_id) {
            return Err(GenerationStoreError::AlreadyExists(request_id));
        }

        self.records
            .insert(request_id, GenerationRecord::from_job(&job));
        self.jobs.insert(request_id, job);

        if let Err(e) = self.queue_sender.try_send(request_id) {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to enqueue generation");
            self.records.remove(&request_id);
            self.jobs.remove(&request_id);
            return Err(GenerationStoreError::QueueUnavailable(e.to_string()));
        }

        tracing::debug!(request_id = %request_id, "Generation submitted");
        Ok(request_id)
    }

    fn take_job(&self, request_id: Uuid) -> Option<GenerationJob> {
        self.jobs.remove(&request_id).map(|(_, job)| job)
    }

    fn get(&self, request_id: Uuid) -> Option<GenerationRecord> {
        self.records.get(&request_id).map(|r| r.clone())
    }

    fn list(&self) -> Vec<GenerationRecord> {
        let mut records: Vec<GenerationRecord> =
            self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    fn set_state(
        &self,
        request_id: Uuid,
        state: GenerationState,
    ) -> Result<(), GenerationStoreError> {
        self.update(request_id, |record| {
            let old_state = record.state;
            record.state = state;
            if state.is_terminal() {
                record.completed_at = Some(Utc::now());
            }
            tracing::debug!(
                request_id = %request_id,
                old_state = ?old_state,
                new_state = ?state,
                "Generation state changed"
            );
        })
    }

    fn set_progress(&self, request_id: Uuid, message: &str) -> Result<(), GenerationStoreError> {
        self.update(request_id, |record| {
            record.progress_message = Some(message.to_string());
        })
    }

    fn set_ready(&self, request_id: Uuid, has_audio: bool) -> Result<(), GenerationStoreError> {
        self.update(request_id, |record| {
            record.state = GenerationState::Ready;
            record.has_video = true;
            record.has_audio = has_audio;
            record.progress_message = None;
            record.completed_at = Some(Utc::now());
        })
    }

    fn set_failed(&self, request_id: Uuid, error: String) -> Result<(), GenerationStoreError> {
        self.update(request_id, |record| {
            record.state = GenerationState::Failed;
            record.error_message = Some(error);
            record.progress_message = None;
            record.has_video = false;
            record.has_audio = false;
            record.completed_at = Some(Utc::now());
        })
    }

    fn expired(&self, retention: Duration) -> Vec<Uuid> {
        let cutoff = Utc::now() - retention;

        self.records
            .iter()
            .filter_map(|entry| match entry.completed_at {
                Some(completed_at) if entry.state.is_terminal() && completed_at < cutoff => {
                    Some(*entry.key())
                }
                _ => None,
            })
            .collect()
    }

    fn remove(&self, request_id: Uuid) -> Option<GenerationRecord> {
        self.jobs.remove(&request_id);
        self.records.remove(&request_id).map(|(_, record)| {
            tracing::debug!(request_id = %request_id, "Generation removed");
            record
        })
    }
}
