//! Artifact HTTP Handlers - 视频与配音下载

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
};
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::application::ports::ArtifactKind;
use crate::application::GetArtifact;
use crate::infrastructure::http::dto::ArtifactQuery;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 流式返回产物文件
///
/// `?download=true` 时以附件形式返回
pub async fn get_artifact(
    State(state): State<Arc<AppState>>,
    Path((request_id, kind)): Path<(Uuid, String)>,
    Query(query): Query<ArtifactQuery>,
) -> Result<Response, ApiError> {
    let kind: ArtifactKind = kind.parse().map_err(ApiError::BadRequest)?;

    let artifact = state
        .get_artifact_handler
        .handle(GetArtifact { request_id, kind })
        .await?;

    let file = tokio::fs::File::open(&artifact.path)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to open artifact: {}", e)))?;

    let file_size = file
        .metadata()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to get file metadata: {}", e)))?
        .len();

    let disposition = if query.download {
        format!("attachment; filename=\"{}\"", artifact.file_name)
    } else {
        format!("inline; filename=\"{}\"", artifact.file_name)
    };

    tracing::debug!(
        request_id = %request_id,
        kind = kind.as_str(),
        size = file_size,
        download = query.download,
        "Serving artifact"
    );

    let body = Body::from_stream(ReaderStream::new(file));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, artifact.content_type)
        .header(header::CONTENT_LENGTH, file_size)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(body)
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}
