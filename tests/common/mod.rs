//! 测试公共模块
//! 提供测试配置、临时 SQLite 存储和应用状态

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use secrecy::Secret;
use sqlx::AnyPool;
use std::sync::Arc;
use storefront_api::{
    auth::{PasswordHasher, SigningKey},
    bootstrap::{BootstrapMode, Bootstrapper},
    config::{
        AppConfig, AppEnvironment, BootstrapConfig, CorsConfig, DatabaseConfig, LoggingConfig,
        SecurityConfig, ServerConfig,
    },
    db,
    middleware::AppState,
    routes,
};

pub const TEST_ORIGIN: &str = "http://localhost:4200";

/// 每个测试使用独立的内存数据库；连接池只保留一个连接，库随连接池释放
pub const TEST_DATABASE_URL: &str = "sqlite::memory:";

/// 创建测试配置
pub fn create_test_config(environment: AppEnvironment) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            graceful_shutdown_timeout_secs: 5,
        },
        database: DatabaseConfig {
            url: Some(Secret::new(TEST_DATABASE_URL.to_string())),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            token_validity_secs: 300,
            password_min_length: 8,
        },
        cors: CorsConfig {
            allowed_origin: TEST_ORIGIN.to_string(),
        },
        bootstrap: BootstrapConfig {
            allow_destructive_reset: environment.is_development(),
        },
        environment,
    }
}

/// 创建测试数据库连接池（尚未初始化模式）
pub async fn create_test_pool(config: &AppConfig) -> AnyPool {
    db::create_pool(&config.database)
        .await
        .expect("Failed to create test database pool")
}

/// 创建并按环境初始化测试数据库
pub async fn setup_test_db(config: &AppConfig) -> AnyPool {
    let pool = create_test_pool(config).await;

    let mode = BootstrapMode::select(
        &config.environment,
        config.bootstrap.allow_destructive_reset,
    )
    .expect("Invalid bootstrap mode");

    Bootstrapper::run(&pool, mode)
        .await
        .expect("Failed to bootstrap test database");

    pool
}

/// 低成本的密码哈希参数，仅用于测试
pub fn fast_hasher() -> PasswordHasher {
    PasswordHasher::with_params(1024, 1, 1).expect("Invalid test hasher params")
}

/// 创建测试应用状态
pub fn create_test_app_state(config: AppConfig, pool: AnyPool) -> Arc<AppState> {
    let signing_key = SigningKey::generate().expect("Failed to generate signing key");
    Arc::new(AppState::new(config, pool, &signing_key, fast_hasher()))
}

/// 创建完整的测试应用
pub async fn create_test_app(environment: AppEnvironment) -> (Router, Arc<AppState>) {
    let config = create_test_config(environment);
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(config, pool);
    let app = routes::create_router(state.clone()).expect("Failed to build router");
    (app, state)
}

/// 构造 JSON 请求
pub fn json_request(method: &str, uri: &str, body: serde_json::Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

/// 构造无请求体的请求
pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    builder.body(Body::empty()).unwrap()
}

/// 读取 JSON 响应体
pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

/// 统计商品行数
pub async fn count_products(pool: &AnyPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await
        .unwrap()
}
