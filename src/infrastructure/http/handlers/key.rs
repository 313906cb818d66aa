//! API Key HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{GetCredentialStatus, RevokeCredential, SelectCredential};
use crate::infrastructure::http::dto::{ApiResponse, Empty, KeyStatusResponse, SelectKeyRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 查询是否已选择 Key
pub async fn key_status(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<KeyStatusResponse>> {
    let status = state
        .get_credential_status_handler
        .handle(GetCredentialStatus);
    Json(ApiResponse::success(status.into()))
}

/// 选择 Key
pub async fn select_key(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectKeyRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .select_credential_handler
        .handle(SelectCredential {
            api_key: req.api_key,
        })?;
    Ok(Json(ApiResponse::ok()))
}

/// 撤销当前 Key
pub async fn revoke_key(State(state): State<Arc<AppState>>) -> Json<ApiResponse<Empty>> {
    state.revoke_credential_handler.handle(RevokeCredential);
    Json(ApiResponse::ok())
}
