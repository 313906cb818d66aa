//! 远程长任务（Operation）

use serde::{Deserialize, Serialize};

/// 远程任务报告的错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    pub code: Option<i32>,
    pub message: String,
}

/// 轮询状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollState {
    /// 远程任务仍在进行
    Pending,
    /// 完成且无错误
    Done,
    /// 完成但报告了错误
    Failed,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Pending)
    }
}

/// 远程视频生成任务句柄
///
/// 在单个生成请求内持有，到达终态后丢弃
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// 远程任务名（用于刷新状态）
    pub name: String,
    /// 是否已完成
    pub done: bool,
    /// 远程报告的错误
    pub error: Option<OperationError>,
    /// 成功时生成视频的下载 URI
    pub video_uri: Option<String>,
}

impl Operation {
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: false,
            error: None,
            video_uri: None,
        }
    }

    pub fn succeeded(name: impl Into<String>, video_uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: true,
            error: None,
            video_uri: Some(video_uri.into()),
        }
    }

    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: true,
            error: Some(OperationError {
                code: None,
                message: message.into(),
            }),
            video_uri: None,
        }
    }

    pub fn state(&self) -> PollState {
        match (self.done, &self.error) {
            (false, _) => PollState::Pending,
            (true, None) => PollState::Done,
            (true, Some(_)) => PollState::Failed,
        }
    }
}
