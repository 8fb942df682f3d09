//! HTTP 中间件
//! 应用状态、请求追踪、开发环境错误详情

use crate::{
    auth::{PasswordHasher, SigningKey, TokenIssuer, TokenValidator},
    config::AppConfig,
    error::InternalErrorDetail,
    services::{AuthService, ProductService, UserService},
};
use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use sqlx::AnyPool;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// 应用状态
///
/// 签发器与校验器由同一个 SigningKey 构建，进程生命周期内只读共享
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: AnyPool,
    pub token_issuer: Arc<TokenIssuer>,
    pub token_validator: Arc<TokenValidator>,
    pub auth_service: Arc<AuthService>,
    pub product_service: Arc<ProductService>,
    pub user_service: Arc<UserService>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: AnyPool,
        signing_key: &SigningKey,
        hasher: PasswordHasher,
    ) -> Self {
        let token_issuer = Arc::new(TokenIssuer::new(
            signing_key,
            config.security.token_validity_secs,
        ));
        let token_validator = Arc::new(TokenValidator::new(signing_key));

        let auth_service = Arc::new(AuthService::new(
            db.clone(),
            token_issuer.clone(),
            Arc::new(hasher),
            config.security.password_min_length,
        ));

        Self {
            product_service: Arc::new(ProductService::new(db.clone())),
            user_service: Arc::new(UserService::new(db.clone())),
            auth_service,
            token_issuer,
            token_validator,
            config,
            db,
        }
    }
}

tokio::task_local! {
    static REQUEST_ID: String;
}

/// 当前请求的 request_id，仅在请求追踪中间件内部可用
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let uri = req.uri().path().to_string();

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    async move {
        let start = Instant::now();

        let mut response = REQUEST_ID
            .scope(request_id.clone(), async move { next.run(req).await })
            .await;

        let elapsed = start.elapsed();

        // 指标标签只使用静态字符串
        let status = response.status().as_u16();
        let method_name = match method.as_str() {
            "GET" => "GET",
            "POST" => "POST",
            "PUT" => "PUT",
            "DELETE" => "DELETE",
            "PATCH" => "PATCH",
            "OPTIONS" => "OPTIONS",
            _ => "UNKNOWN",
        };
        let status_code = match status {
            200 => "200",
            201 => "201",
            204 => "204",
            400 => "400",
            401 => "401",
            404 => "404",
            409 => "409",
            500 => "500",
            _ => "other",
        };

        metrics::counter!("http_requests_total", "method" => method_name, "status" => status_code)
            .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            method = %method,
            uri = %uri,
            status = status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );

        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// 开发环境错误详情中间件
/// 把错误响应扩展中的内部详情渲染进响应体；只在 Development 挂载
pub async fn developer_error_detail_middleware(req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    let body = match response.extensions().get::<InternalErrorDetail>() {
        Some(InternalErrorDetail(detail)) => match serde_json::to_vec(detail) {
            Ok(body) => body,
            Err(_) => return response,
        },
        None => return response,
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Response::from_parts(parts, Body::from(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_current_request_id_is_scoped() {
        assert!(current_request_id().is_none());

        let seen = REQUEST_ID
            .scope("req-42".to_string(), async { current_request_id() })
            .await;
        assert_eq!(seen.as_deref(), Some("req-42"));
    }

    #[test]
    fn test_extract_or_generate_trace_id() {
        let mut headers = HeaderMap::new();
        headers.insert("x-trace-id", "test-trace-123".parse().unwrap());

        let trace_id = extract_or_generate_trace_id(&headers);
        assert_eq!(trace_id, "test-trace-123");

        let headers = HeaderMap::new();
        let trace_id = extract_or_generate_trace_id(&headers);
        assert!(!trace_id.is_empty());
        assert_ne!(trace_id, "test-trace-123");
    }
}
