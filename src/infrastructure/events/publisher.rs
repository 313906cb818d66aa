//! Event Publisher Implementation
//!
//! WebSocket 事件推送实现，每个生成请求一个 broadcast 通道

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::application::ports::GenerationState;

/// WebSocket 事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum WsEvent {
    /// 生成阶段变更
    StateChanged {
        request_id: Uuid,
        state: GenerationState,
    },
    /// 轮询期间的进度文案
    Progress { request_id: Uuid, message: String },
    /// 生成完成，产物可下载
    Ready { request_id: Uuid, has_audio: bool },
    /// 生成失败
    Failed {
        request_id: Uuid,
        error: String,
        /// 已撤销当前 Key，需要重新选择
        credential_revoked: bool,
    },
}

impl WsEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WsEvent::Ready { .. } | WsEvent::Failed { .. })
    }
}

/// 事件发布器
pub struct EventPublisher {
    /// request_id -> broadcast sender
    request_channels: DashMap<Uuid, broadcast::Sender<WsEvent>>,
    capacity: usize,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            request_channels: DashMap::new(),
            capacity,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅请求的事件，通道不存在时创建
    pub fn subscribe(&self, request_id: Uuid) -> broadcast::Receiver<WsEvent> {
        self.request_channels
            .entry(request_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// 请求结束后关闭通道，订阅者读完缓冲后收到 Closed
    pub fn close(&self, request_id: Uuid) {
        self.request_channels.remove(&request_id);
    }

    pub fn publish_state(&self, request_id: Uuid, state: GenerationState) {
        self.publish(request_id, WsEvent::StateChanged { request_id, state });
    }

    pub fn publish_progress(&self, request_id: Uuid, message: &str) {
        self.publish(
            request_id,
            WsEvent::Progress {
                request_id,
                message: message.to_string(),
            },
        );
    }

    pub fn publish_ready(&self, request_id: Uuid, has_audio: bool) {
        self.publish(request_id, WsEvent::Ready { request_id, has_audio });
    }

    pub fn publish_failed(&self, request_id: Uuid, error: &str, credential_revoked: bool) {
        self.publish(
            request_id,
            WsEvent::Failed {
                request_id,
                error: error.to_string(),
                credential_revoked,
            },
        );
    }

    /// 发布事件到指定请求
    fn publish(&self, request_id: Uuid, event: WsEvent) {
        if let Some(sender) = self.request_channels.get(&request_id) {
            if let Err(e) = sender.send(event) {
                tracing::debug!(
                    request_id = %request_id,
                    error = %e,
                    "Failed to publish event (no receivers)"
                );
            }
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_events_until_close() {
        let publisher = EventPublisher::new();
        let request_id = Uuid::new_v4();
        let mut rx = publisher.subscribe(request_id);

        publisher.publish_state(request_id, GenerationState::Polling);
        publisher.publish_progress(request_id, "Rendering...");
        publisher.publish_ready(request_id, true);
        publisher.close(request_id);

        assert_eq!(
            rx.recv().await.unwrap(),
            WsEvent::StateChanged {
                request_id,
                state: GenerationState::Polling
            }
        );
        assert!(matches!(rx.recv().await.unwrap(), WsEvent::Progress { .. }));
        assert!(rx.recv().await.unwrap().is_terminal());
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_events_are_scoped_to_request() {
        let publisher = EventPublisher::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut rx_a = publisher.subscribe(a);

        publisher.publish_failed(b, "boom", false);
        publisher.publish_state(a, GenerationState::Downloading);

        assert!(matches!(
            rx_a.recv().await.unwrap(),
            WsEvent::StateChanged { request_id, .. } if request_id == a
        ));
    }

    #[test]
    fn test_event_json_shape() {
        let request_id = Uuid::nil();
        let json = serde_json::to_value(WsEvent::StateChanged {
            request_id,
            state: GenerationState::SynthesizingSpeech,
        })
        .unwrap();
        assert_eq!(json["event"], "state_changed");
        assert_eq!(json["data"]["state"], "synthesizing_speech");
    }
}
