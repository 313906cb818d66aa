//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                          GET   健康检查
//! - /api/key/status                    GET   是否已选择 API Key
//! - /api/key/select                    POST  选择 API Key
//! - /api/key/revoke                    POST  撤销 API Key
//! - /api/voice/list                    GET   预置配音音色
//! - /api/music/list                    GET   背景音乐列表
//! - /api/generate/submit               POST  提交生成请求
//! - /api/generate/status               POST  查询生成状态
//! - /api/generate/list                 GET   列出所有生成请求
//! - /api/artifact/{id}/{video|audio}   GET   获取产物（?download=true 下载）
//! - /ws/generation/{id}                WS    生成进度事件

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes()).route(
        "/ws/generation/:request_id",
        get(handlers::generation_websocket_handler),
    )
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/key", key_routes())
        .route("/voice/list", get(handlers::list_voices))
        .route("/music/list", get(handlers::list_music))
        .nest("/generate", generate_routes())
        .route("/artifact/:request_id/:kind", get(handlers::get_artifact))
}

/// Key 路由
fn key_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/status", get(handlers::key_status))
        .route("/select", post(handlers::select_key))
        .route("/revoke", post(handlers::revoke_key))
}

/// Generate 路由
fn generate_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/submit", post(handlers::submit_generation))
        .route("/status", post(handlers::generation_status))
        .route("/list", get(handlers::list_generations))
}
