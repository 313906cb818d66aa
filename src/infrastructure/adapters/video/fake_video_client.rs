//! Fake Video Client - 用于测试的视频生成客户端
//!
//! 按脚本依次返回刷新结果，记录调用次数

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::application::ports::{VideoError, VideoGeneratorPort};
use crate::domain::generation::{ApiKey, Operation, VideoGenerationRequest};

/// Fake Video Client
pub struct FakeVideoClient {
    initial: Operation,
    script: Mutex<VecDeque<Result<Operation, VideoError>>>,
    generate_error: Mutex<Option<VideoError>>,
    last_request: Mutex<Option<VideoGenerationRequest>>,
    generate_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
}

impl FakeVideoClient {
    /// `initial` 为提交后返回的任务，`script` 为每次刷新依次返回的结果
    pub fn new(initial: Operation, script: Vec<Result<Operation, VideoError>>) -> Self {
        Self {
            initial,
            script: Mutex::new(script.into()),
            generate_error: Mutex::new(None),
            last_request: Mutex::new(None),
            generate_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
        }
    }

    /// 立即完成的客户端
    pub fn completed(video_uri: impl Into<String>) -> Self {
        Self::new(Operation::succeeded("operations/fake", video_uri), Vec::new())
    }

    /// 提交时直接返回错误
    pub fn with_generate_error(self, error: VideoError) -> Self {
        if let Ok(mut slot) = self.generate_error.lock() {
            *slot = Some(error);
        }
        self
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<VideoGenerationRequest> {
        self.last_request.lock().ok().and_then(|r| r.clone())
    }
}

#[async_trait]
impl VideoGeneratorPort for FakeVideoClient {
    async fn generate(
        &self,
        _credential: &ApiKey,
        request: &VideoGenerationRequest,
    ) -> Result<Operation, VideoError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        let error = self.generate_error.lock().ok().and_then(|mut e| e.take());
        if let Some(error) = error {
            return Err(error);
        }

        Ok(self.initial.clone())
    }

    async fn refresh(
        &self,
        _credential: &ApiKey,
        operation: &Operation,
    ) -> Result<Operation, VideoError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(operation = %operation.name, "FakeVideoClient: refresh");

        self.script
            .lock()
            .map_err(|e| VideoError::ServiceError(e.to_string()))?
            .pop_front()
            .unwrap_or_else(|| {
                Err(VideoError::InvalidResponse(
                    "no scripted refresh result left".to_string(),
                ))
            })
    }
}
