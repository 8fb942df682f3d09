//! 启动时的存储初始化
//!
//! 按运行环境二选一，启动时只执行一次：
//! - `DevelopmentReset`：删除全部表、重建模式、写入种子商品（破坏性）
//! - `ProductionEnsure`：仅在表不存在时创建，不删除、不写入任何数据
//!
//! 整个过程在同一个事务里完成，事务结束即归还连接，
//! 服务开始监听前不会有请求看到半初始化的存储。

pub mod fixtures;
pub mod schema;

use crate::{
    config::{AppConfig, AppEnvironment},
    error::AppError,
};
use fixtures::FIXTURE_CATALOG;
use schema::TABLES;
use sqlx::{Any, AnyPool, Transaction};
use std::fmt;

/// 初始化模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapMode {
    /// 删除并重建，写入种子数据（仅开发环境，且需显式开启）
    DevelopmentReset,
    /// 确保模式存在，从不删除数据
    ProductionEnsure,
}

impl BootstrapMode {
    /// 根据环境和显式开关选择模式
    ///
    /// 破坏性模式要求同时满足：环境为 Development 且 `allow_destructive_reset = true`。
    /// 非开发环境打开该开关视为配置错误，拒绝启动。
    pub fn select(
        environment: &AppEnvironment,
        allow_destructive_reset: bool,
    ) -> Result<Self, AppError> {
        match (environment, allow_destructive_reset) {
            (AppEnvironment::Development, true) => Ok(BootstrapMode::DevelopmentReset),
            (AppEnvironment::Development, false) => {
                tracing::warn!(
                    "Development environment without bootstrap.allow_destructive_reset, \
                     keeping existing data"
                );
                Ok(BootstrapMode::ProductionEnsure)
            }
            (env, true) => Err(AppError::Config(format!(
                "bootstrap.allow_destructive_reset is only permitted in Development, \
                 refusing to start in {}",
                env
            ))),
            (_, false) => Ok(BootstrapMode::ProductionEnsure),
        }
    }

    pub fn is_destructive(&self) -> bool {
        matches!(self, BootstrapMode::DevelopmentReset)
    }
}

impl fmt::Display for BootstrapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapMode::DevelopmentReset => f.write_str("development-reset"),
            BootstrapMode::ProductionEnsure => f.write_str("production-ensure"),
        }
    }
}

/// 初始化结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub mode: BootstrapMode,
    pub fixtures_inserted: usize,
    pub products_present: i64,
}

/// 初始化错误，均为致命错误
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Failed to open bootstrap transaction: {0}")]
    Begin(#[source] sqlx::Error),

    #[error("Failed to reset store (table {table}): {source}")]
    Reset {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to create schema (table {table}): {source}")]
    Schema {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to insert fixture '{name}': {source}")]
    Seed {
        name: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to commit bootstrap: {0}")]
    Commit(#[source] sqlx::Error),
}

/// 存储初始化器
pub struct Bootstrapper;

impl Bootstrapper {
    /// 根据配置选择模式并执行
    pub async fn run_for(pool: &AnyPool, config: &AppConfig) -> anyhow::Result<BootstrapReport> {
        let mode = BootstrapMode::select(
            &config.environment,
            config.bootstrap.allow_destructive_reset,
        )?;

        Ok(Self::run(pool, mode).await?)
    }

    /// 执行初始化
    /// 任一步骤失败都会回滚事务并返回错误，调用方应终止启动
    pub async fn run(pool: &AnyPool, mode: BootstrapMode) -> Result<BootstrapReport, BootstrapError> {
        tracing::info!(
            mode = %mode,
            destructive = mode.is_destructive(),
            "Bootstrapping store..."
        );

        // 事务持有独占连接，提交或 drop 时归还
        let mut tx = pool.begin().await.map_err(BootstrapError::Begin)?;

        let fixtures_inserted = match mode {
            BootstrapMode::DevelopmentReset => {
                reset(&mut tx).await?;
                ensure_schema(&mut tx).await?;
                seed(&mut tx).await?
            }
            BootstrapMode::ProductionEnsure => {
                ensure_schema(&mut tx).await?;
                0
            }
        };

        let products_present: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *tx)
            .await
            .map_err(|source| BootstrapError::Schema {
                table: "products",
                source,
            })?;

        tx.commit().await.map_err(BootstrapError::Commit)?;

        let report = BootstrapReport {
            mode,
            fixtures_inserted,
            products_present,
        };

        tracing::info!(
            mode = %report.mode,
            fixtures_inserted = report.fixtures_inserted,
            products_present = report.products_present,
            "Store bootstrap completed"
        );

        Ok(report)
    }
}

async fn reset(tx: &mut Transaction<'static, Any>) -> Result<(), BootstrapError> {
    tracing::warn!("Dropping all application tables (development reset)");

    for (statement, table) in schema::drop_statements().into_iter().zip(TABLES.iter().rev()) {
        sqlx::query(&statement)
            .execute(&mut **tx)
            .await
            .map_err(|source| BootstrapError::Reset {
                table: table.name.to_string(),
                source,
            })?;
    }

    Ok(())
}

async fn ensure_schema(tx: &mut Transaction<'static, Any>) -> Result<(), BootstrapError> {
    for table in TABLES {
        sqlx::query(table.create_sql)
            .execute(&mut **tx)
            .await
            .map_err(|source| BootstrapError::Schema {
                table: table.name,
                source,
            })?;
        tracing::debug!(table = table.name, "Table ensured");
    }

    Ok(())
}

async fn seed(tx: &mut Transaction<'static, Any>) -> Result<usize, BootstrapError> {
    for product in FIXTURE_CATALOG {
        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, description, retail_price, wholesale_price, category, stock, pic_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(product.name)
        .bind(product.description)
        .bind(product.retail_price)
        .bind(product.wholesale_price)
        .bind(product.category)
        .bind(product.stock)
        .bind(product.pic_url)
        .execute(&mut **tx)
        .await
        .map_err(|source| BootstrapError::Seed {
            name: product.name,
            source,
        })?;
    }

    Ok(FIXTURE_CATALOG.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_with_opt_in_resets() {
        let mode = BootstrapMode::select(&AppEnvironment::Development, true).unwrap();
        assert_eq!(mode, BootstrapMode::DevelopmentReset);
        assert!(mode.is_destructive());
    }

    #[test]
    fn test_development_without_opt_in_is_safe() {
        let mode = BootstrapMode::select(&AppEnvironment::Development, false).unwrap();
        assert_eq!(mode, BootstrapMode::ProductionEnsure);
    }

    #[test]
    fn test_production_never_resets() {
        let mode = BootstrapMode::select(&AppEnvironment::Production, false).unwrap();
        assert_eq!(mode, BootstrapMode::ProductionEnsure);
        assert!(!mode.is_destructive());

        assert!(BootstrapMode::select(&AppEnvironment::Production, true).is_err());
    }

    #[test]
    fn test_other_environment_treated_as_production() {
        let staging = AppEnvironment::Other("Staging".to_string());
        assert_eq!(
            BootstrapMode::select(&staging, false).unwrap(),
            BootstrapMode::ProductionEnsure
        );
        assert!(matches!(
            BootstrapMode::select(&staging, true),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(BootstrapMode::DevelopmentReset.to_string(), "development-reset");
        assert_eq!(BootstrapMode::ProductionEnsure.to_string(), "production-ensure");
    }
}
