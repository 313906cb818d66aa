//! HTTP Middleware
//!
//! HTTP 状态码错误日志中间件

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// HTTP 状态码错误日志中间件
///
/// 只记录传输层的 4xx/5xx（路由不存在、请求体解析失败、静态文件缺失等），
/// 业务错误固定返回 200，在 `ApiError::into_response` 中记录
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP client error"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request as HttpRequest, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use tower::util::ServiceExt;

    #[derive(serde::Deserialize)]
    struct Submit {
        #[allow(dead_code)]
        prompt: String,
    }

    async fn submit(Json(_body): Json<Submit>) -> &'static str {
        "OK"
    }

    async fn failing() -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn router() -> Router {
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .route("/submit", post(submit))
            .route("/failing", get(failing))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    async fn status_of(request: HttpRequest<Body>) -> StatusCode {
        router().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let request = HttpRequest::builder().uri("/ping").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_client_error() {
        let request = HttpRequest::builder()
            .uri("/api/unknown")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_json_is_client_error() {
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/submit")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{\"prompt\":"))
            .unwrap();
        assert!(status_of(request).await.is_client_error());
    }

    #[tokio::test]
    async fn test_server_error_passes_through() {
        let request = HttpRequest::builder()
            .uri("/failing")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
