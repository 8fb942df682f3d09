//! 数据库连接池与健康检查
//! 通过 sqlx Any 驱动同时支持 SQLite（开发）和 PostgreSQL（生产）

use crate::config::DatabaseConfig;
use secrecy::ExposeSecret;
use sqlx::{any::AnyPoolOptions, AnyPool};
use std::time::Duration;

/// 创建数据库连接池
pub async fn create_pool(config: &DatabaseConfig) -> Result<AnyPool, DbError> {
    let db_url = config.url.as_ref().ok_or(DbError::MissingUrl)?.expose_secret();

    sqlx::any::install_default_drivers();

    tracing::debug!(backend = backend_name(db_url), "Creating database connection pool...");

    let pool = AnyPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .test_before_acquire(true)
        .connect(db_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create database pool: {}", e);
            DbError::ConnectionFailed(e.to_string())
        })?;

    tracing::info!(
        backend = backend_name(db_url),
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database pool created successfully"
    );

    Ok(pool)
}

/// 从连接串推断后端名称（仅用于日志，不输出连接串本身）
pub fn backend_name(db_url: &str) -> &'static str {
    match db_url.split(':').next() {
        Some("sqlite") => "sqlite",
        Some("postgres") | Some("postgresql") => "postgres",
        _ => "unknown",
    }
}

/// 数据库健康检查
pub async fn health_check(pool: &AnyPool) -> HealthStatus {
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => {
            tracing::debug!("Database health check: OK");
            HealthStatus::Healthy
        }
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            HealthStatus::Unhealthy(e.to_string())
        }
    }
}

/// 记录数据库连接池指标
pub fn record_pool_metrics(pool: &AnyPool) {
    metrics::gauge!("db.pool.size").set(pool.size() as f64);
    metrics::gauge!("db.pool.idle").set(pool.num_idle() as f64);
}

/// 数据库错误类型
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database URL is not configured")]
    MissingUrl,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

/// 健康状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_name() {
        assert_eq!(backend_name("sqlite::memory:"), "sqlite");
        assert_eq!(backend_name("sqlite://storefront.db?mode=rwc"), "sqlite");
        assert_eq!(backend_name("postgres://u:p@localhost/shop"), "postgres");
        assert_eq!(backend_name("postgresql://u:p@localhost/shop"), "postgres");
        assert_eq!(backend_name("mssql://localhost"), "unknown");
    }

    #[tokio::test]
    async fn test_missing_url_is_rejected() {
        let config = DatabaseConfig {
            url: None,
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 60,
            max_lifetime_secs: 60,
        };

        assert!(matches!(create_pool(&config).await, Err(DbError::MissingUrl)));
    }

    #[tokio::test]
    async fn test_health_check_in_memory() {
        let config = DatabaseConfig {
            url: Some(secrecy::Secret::new("sqlite::memory:".to_string())),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 60,
            max_lifetime_secs: 60,
        };

        let pool = create_pool(&config).await.unwrap();
        assert_eq!(health_check(&pool).await, HealthStatus::Healthy);
    }
}
