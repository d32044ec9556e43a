use aqariy_price::transport::{router, AppState};
use aqariy_price::utils::{error::PriceError, logger, validation};
use aqariy_price::{load_service, CliConfig};
use clap::Parser;
use std::sync::Arc;

/// 啟動失敗：記錄、提示並以非零碼結束
fn exit_with(stage: &str, e: &PriceError) -> ! {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
        stage,
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());
    std::process::exit(e.severity().exit_code().max(1));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose);
            exit_with("Configuration", &e);
        }
    };

    // 初始化日誌
    let verbose = cli.verbose || config.log_level() == Some("debug");
    logger::init_logger(verbose, config.json_logs());

    tracing::info!("Starting aqariy-serve");
    tracing::debug!("Resolved config: {:?}", config);

    let service = match load_service(&config).await {
        Ok(service) => service,
        Err(e) => exit_with("Artifact loading", &e),
    };

    let state = Arc::new(AppState::new(service));
    let app = router(state, config.server.static_dir.as_deref());

    let addr = match validation::validate_socket_addr("server.bind", &config.server.bind) {
        Ok(addr) => addr,
        Err(e) => exit_with("Configuration", &e),
    };
    tracing::info!("🌐 Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
