//! Catalog HTTP Handlers - 音色与背景音乐

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{ListMusic, ListVoices};
use crate::infrastructure::http::dto::{ApiResponse, MusicResponse, VoiceResponse};
use crate::infrastructure::http::state::AppState;

pub async fn list_voices(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<VoiceResponse>>> {
    let voices = state
        .list_voices_handler
        .handle(ListVoices)
        .into_iter()
        .map(VoiceResponse::from)
        .collect();
    Json(ApiResponse::success(voices))
}

pub async fn list_music(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<MusicResponse>>> {
    let tracks = state
        .list_music_handler
        .handle(ListMusic)
        .into_iter()
        .map(MusicResponse::from)
        .collect();
    Json(ApiResponse::success(tracks))
}
