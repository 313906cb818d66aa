//! Operation Poller - 远程长任务轮询
//!
//! 两个独立定时器，生命周期绑定在同一个 CancellationToken 上:
//! - 轮询循环：每 `poll_interval` 刷新一次任务状态，直到终态
//! - 进度定时器：每 `progress_interval` 循环输出一条进度文案
//!
//! 任何退出路径（成功、失败、网络错误、future 被丢弃）都会取消进度定时器

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::application::error::ApplicationError;
use crate::application::ports::{ProgressReporter, VideoError, VideoGeneratorPort};
use crate::domain::generation::{
    ApiKey, Operation, PollState, ProgressMessages, PROGRESS_MESSAGES,
};

/// 轮询错误
#[derive(Debug, Error)]
pub enum PollError {
    /// 刷新请求本身失败（网络/传输），不重试
    #[error("status check failed: {0}")]
    StatusCheckFailed(#[source] VideoError),

    /// 远程任务报告失败
    #[error("generation failed: {0}")]
    GenerationFailed(String),
}

impl From<PollError> for ApplicationError {
    fn from(err: PollError) -> Self {
        match err {
            PollError::StatusCheckFailed(VideoError::InvalidCredential(msg)) => {
                ApplicationError::InvalidCredential(msg)
            }
            err @ PollError::StatusCheckFailed(_) => ApplicationError::Transport(err.to_string()),
            PollError::GenerationFailed(reason) => ApplicationError::GenerationFailed(reason),
        }
    }
}

/// 轮询配置
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// 状态刷新间隔
    pub poll_interval: Duration,
    /// 进度文案切换间隔
    pub progress_interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            progress_interval: Duration::from_secs(5),
        }
    }
}

/// 远程任务轮询器
pub struct OperationPoller {
    generator: Arc<dyn VideoGeneratorPort>,
    config: PollerConfig,
    messages: &'static [&'static str],
}

impl OperationPoller {
    pub fn new(generator: Arc<dyn VideoGeneratorPort>, config: PollerConfig) -> Self {
        Self {
            generator,
            config,
            messages: PROGRESS_MESSAGES,
        }
    }

    pub fn with_messages(mut self, messages: &'static [&'static str]) -> Self {
        self.messages = messages;
        self
    }

    /// 轮询直到任务进入终态
    ///
    /// 已完成的任务不会再发起刷新；返回时进度定时器已经停止
    pub async fn poll_until_done(
        &self,
        credential: &ApiKey,
        operation: Operation,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Result<Operation, PollError> {
        let token = CancellationToken::new();
        let ticker = tokio::spawn(run_progress_ticker(
            token.clone(),
            self.config.progress_interval,
            ProgressMessages::new(self.messages),
            reporter,
        ));
        // future 被丢弃时同样取消定时器
        let guard = token.drop_guard();

        let result = self.poll_loop(credential, operation).await;

        drop(guard);
        if let Err(e) = ticker.await {
            tracing::warn!(error = %e, "Progress ticker task aborted");
        }

        result
    }

    async fn poll_loop(
        &self,
        credential: &ApiKey,
        mut operation: Operation,
    ) -> Result<Operation, PollError> {
        let mut polls: u32 = 0;

        while !operation.done {
            tokio::time::sleep(self.config.poll_interval).await;
            polls += 1;

            operation = self
                .generator
                .refresh(credential, &operation)
                .await
                .map_err(|e| {
                    tracing::warn!(
                        operation = %operation.name,
                        polls = polls,
                        error = %e,
                        "Operation status check failed"
                    );
                    PollError::StatusCheckFailed(e)
                })?;

            tracing::debug!(
                operation = %operation.name,
                polls = polls,
                done = operation.done,
                "Operation status refreshed"
            );
        }

        match operation.state() {
            PollState::Failed => {
                let reason = operation
                    .error
                    .map(|e| e.message)
                    .unwrap_or_else(|| "unknown error".to_string());
                tracing::warn!(polls = polls, reason = %reason, "Operation failed");
                Err(PollError::GenerationFailed(reason))
            }
            _ => {
                tracing::info!(operation = %operation.name, polls = polls, "Operation completed");
                Ok(operation)
            }
        }
    }
}

/// 进度文案定时器，首条立即输出
async fn run_progress_ticker(
    token: CancellationToken,
    interval: Duration,
    mut messages: ProgressMessages,
    reporter: Arc<dyn ProgressReporter>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                if let Some(message) = messages.next() {
                    reporter.on_progress(message);
                }
            }
        }
    }
}
