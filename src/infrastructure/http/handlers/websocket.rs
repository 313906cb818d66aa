//! WebSocket Handler - 生成进度推送

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::application::ports::{GenerationRecord, GenerationState};
use crate::infrastructure::events::WsEvent;
use crate::infrastructure::http::state::AppState;

/// 单个生成请求的 WebSocket 连接
pub async fn generation_websocket_handler(
    ws: WebSocketUpgrade,
    Path(request_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_generation_socket(socket, request_id, state))
}

/// 连接建立时的快照事件，保证晚到的订阅者也能拿到当前状态
fn snapshot_events(record: &GenerationRecord) -> Vec<WsEvent> {
    let request_id = record.request_id;
    match record.state {
        GenerationState::Ready => vec![WsEvent::Ready {
            request_id,
            has_audio: record.has_audio,
        }],
        GenerationState::Failed => vec![WsEvent::Failed {
            request_id,
            error: record.error_message.clone().unwrap_or_default(),
            credential_revoked: false,
        }],
        state => {
            let mut events = vec![WsEvent::StateChanged { request_id, state }];
            if let Some(message) = &record.progress_message {
                events.push(WsEvent::Progress {
                    request_id,
                    message: message.clone(),
                });
            }
            events
        }
    }
}

async fn send_event(
    sender: &mut SplitSink<WebSocket, Message>,
    event: &WsEvent,
) -> Result<(), axum::Error> {
    match serde_json::to_string(event) {
        Ok(json) => sender.send(Message::Text(json)).await,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize event");
            Ok(())
        }
    }
}

async fn handle_generation_socket(socket: WebSocket, request_id: Uuid, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // 先订阅再读快照，避免漏掉两者之间的事件
    let mut event_rx = state.event_publisher.subscribe(request_id);

    let Some(record) = state.store.get(request_id) else {
        tracing::warn!(request_id = %request_id, "WebSocket connection rejected: unknown request");
        state.event_publisher.close(request_id);
        let _ = sender.close().await;
        return;
    };

    tracing::info!(request_id = %request_id, state = record.state.as_str(), "WebSocket connected");

    for event in snapshot_events(&record) {
        if send_event(&mut sender, &event).await.is_err() {
            return;
        }
    }

    if record.state.is_terminal() {
        // worker 已关闭过通道，这里的订阅重新创建了它
        state.event_publisher.close(request_id);
        let _ = sender.close().await;
        return;
    }

    // 事件转发任务
    let forward_task = tokio::spawn(async move {
        loop {
            let event = match event_rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(request_id = %request_id, skipped, "WebSocket subscriber lagged");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            if let Err(e) = send_event(&mut sender, &event).await {
                tracing::debug!(
                    request_id = %request_id,
                    error = %e,
                    "Failed to send WebSocket message"
                );
                return;
            }

            if event.is_terminal() {
                break;
            }
        }
        let _ = sender.close().await;
    });

    // 接收客户端消息（心跳）
    let receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::info!(request_id = %request_id, "WebSocket closed by client");
                    break;
                }
                Err(e) => {
                    tracing::debug!(request_id = %request_id, error = %e, "WebSocket error");
                    break;
                }
                // Ping 由 axum 自动响应 pong
                _ => {}
            }
        }
    });

    // 等待任一任务完成
    tokio::select! {
        _ = forward_task => {}
        _ = receive_task => {}
    }

    tracing::info!(request_id = %request_id, "WebSocket disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::GenerationJob;
    use crate::domain::generation::{Prompt, VoiceName};

    fn record(state: GenerationState) -> GenerationRecord {
        let job = GenerationJob::new(Prompt::new("a cat").unwrap(), VoiceName::new("Kore").unwrap());
        let mut record = GenerationRecord::from_job(&job);
        record.state = state;
        record
    }

    #[test]
    fn test_snapshot_of_running_request_includes_progress() {
        let mut running = record(GenerationState::Polling);
        running.progress_message = Some("Rendering frames".to_string());

        let events = snapshot_events(&running);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            WsEvent::StateChanged {
                state: GenerationState::Polling,
                ..
            }
        ));
        assert!(matches!(&events[1], WsEvent::Progress { message, .. } if message == "Rendering frames"));
    }

    #[test]
    fn test_snapshot_of_terminal_request() {
        let mut ready = record(GenerationState::Ready);
        ready.has_audio = true;
        let events = snapshot_events(&ready);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], WsEvent::Ready { has_audio: true, .. }));

        let mut failed = record(GenerationState::Failed);
        failed.error_message = Some("generation failed: quota".to_string());
        let events = snapshot_events(&failed);
        assert!(events[0].is_terminal());
        assert!(matches!(&events[0], WsEvent::Failed { error, .. } if error.contains("quota")));
    }
}
