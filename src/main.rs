//! 网店后端服务主入口
//! 启动顺序：配置 → 日志 → 签名密钥 → 数据库连接池 → 存储初始化 → 路由 → 监听

use std::sync::Arc;
use storefront_api::{
    auth::{PasswordHasher, SigningKey},
    bootstrap::Bootstrapper,
    config::{AppConfig, ENVIRONMENT_VAR},
    db,
    handlers::health,
    middleware::AppState,
    routes, telemetry,
};
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("storefront-api {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("未知参数: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 加载 .env 文件；生产环境应直接设置环境变量
    dotenv::dotenv().ok();

    health::set_start_time();

    // 1. 加载配置
    let config = AppConfig::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    // 2. 初始化日志
    telemetry::init_telemetry(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        error_detail = config.environment.is_development(),
        "Storefront API starting..."
    );

    // 3. 签名密钥：进程内只生成一次，签发与校验共用
    let signing_key = SigningKey::generate()?;

    // 4. 数据库连接池
    let db_pool = db::create_pool(&config.database).await?;

    // 5. 存储初始化，失败则终止启动
    Bootstrapper::run_for(&db_pool, &config).await.map_err(|e| {
        tracing::error!(error = %e, "Store bootstrap failed, aborting startup");
        e
    })?;

    // 6. 构建应用状态与路由
    let app_state = Arc::new(AppState::new(
        config.clone(),
        db_pool,
        &signing_key,
        PasswordHasher::new(),
    ));
    drop(signing_key);

    tracing::info!(
        token_validity_secs = app_state.token_issuer.validity_secs(),
        clock_skew_secs = app_state.token_validator.policy().clock_skew_secs,
        "Bearer token authentication configured"
    );

    let app = routes::create_router(app_state)?;

    // 7. 启动服务器
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, "Server listening");

    // 8. 优雅关闭
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.graceful_shutdown_timeout_secs))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// 优雅关闭信号处理
/// 收到信号后开始排空连接，超时仍未结束则强制退出
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }

    tokio::spawn(async move {
        tokio::time::sleep(tokio::time::Duration::from_secs(timeout_secs)).await;
        tracing::warn!("Graceful shutdown timeout reached, forcing exit");
        std::process::exit(1);
    });
}

/// 打印帮助信息
fn print_help() {
    println!("storefront-api {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: storefront-api [选项]");
    println!();
    println!("选项:");
    println!("  --version     打印版本信息并退出");
    println!("  --help        打印此帮助信息并退出");
    println!();
    println!("环境变量:");
    println!("  {}        运行环境（Development / Production，默认 Production）", ENVIRONMENT_VAR);
    println!("  SHOP_<SECTION>__<KEY>   覆盖 config/ 目录中的配置，例如 SHOP_DATABASE__URL");
}
