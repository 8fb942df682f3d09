//! 路由注册
//! 创建所有 API 路由并按顺序挂载中间件：
//! CORS → 请求追踪 → 开发环境错误详情 → HSTS → 路由（受保护路由再经过 JWT 认证）

use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
};

use crate::{config::CorsConfig, error::AppError, handlers, middleware::AppState};

/// HSTS 有效期（30 天）
const HSTS_VALUE: &str = "max-age=2592000";

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Result<Router, AppError> {
    let cors = build_cors_layer(&state.config.cors)?;

    // 公开端点
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/products", get(handlers::product::list_products))
        .route("/api/v1/products/{id}", get(handlers::product::get_product));

    // 需要认证的路由
    let authenticated_routes = Router::new()
        .route("/api/v1/auth/me", get(handlers::auth::get_current_user))
        .route("/api/v1/products", post(handlers::product::create_product))
        .route(
            "/api/v1/products/{id}",
            axum::routing::put(handlers::product::update_product)
                .delete(handlers::product::delete_product),
        )
        .route("/api/v1/users/{id}", get(handlers::user::get_user))
        .layer(axum::middleware::from_fn_with_state(
            state.token_validator.clone(),
            crate::auth::middleware::jwt_auth_middleware,
        ));

    let mut app = Router::new().merge(public_routes).merge(authenticated_routes);

    if state.config.environment.is_development() {
        app = app.layer(axum::middleware::from_fn(
            crate::middleware::developer_error_detail_middleware,
        ));
    } else {
        app = app.layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS_VALUE),
        ));
    }

    Ok(app
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .layer(cors)
        .with_state(state))
}

/// 构建 CORS 策略：只允许一个受信任来源，方法和请求头不限
pub fn build_cors_layer(config: &CorsConfig) -> Result<CorsLayer, AppError> {
    let origin = HeaderValue::from_str(config.allowed_origin.trim()).map_err(|e| {
        AppError::Config(format!(
            "Invalid cors.allowed_origin '{}': {}",
            config.allowed_origin, e
        ))
    })?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods(Any)
        .allow_headers(Any))
}
