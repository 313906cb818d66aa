//! Generation HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{GetGeneration, ListGenerations, SubmitGeneration};
use crate::infrastructure::http::dto::{
    ApiResponse, GenerationStatusRequest, GenerationView, SubmitGenerationRequest, SubmitResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 提交生成请求
///
/// 立即返回 request_id，进度通过 `/ws/generation/{id}` 或 status 接口获取
pub async fn submit_generation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitGenerationRequest>,
) -> Result<Json<ApiResponse<SubmitResponse>>, ApiError> {
    let command = SubmitGeneration {
        prompt: req.prompt,
        script: req.script,
        voice: req.voice,
        music_id: req.music_id,
        resolution: req.resolution,
        aspect_ratio: req.aspect_ratio,
    };

    let response = state.submit_generation_handler.handle(command)?;

    Ok(Json(ApiResponse::success(SubmitResponse {
        request_id: response.request_id,
    })))
}

/// 查询生成状态
pub async fn generation_status(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerationStatusRequest>,
) -> Result<Json<ApiResponse<GenerationView>>, ApiError> {
    let record = state.get_generation_handler.handle(GetGeneration {
        request_id: req.request_id,
    })?;
    Ok(Json(ApiResponse::success(record.into())))
}

/// 列出所有生成请求
pub async fn list_generations(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<GenerationView>>> {
    let records = state
        .list_generations_handler
        .handle(ListGenerations)
        .into_iter()
        .map(GenerationView::from)
        .collect();
    Json(ApiResponse::success(records))
}
