use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{debug, error, warn};

// 从 lib.rs 导入模块
use rust_lms_next::config::AppConfig;
use rust_lms_next::runtime::lifetime;

#[tokio::main]
async fn main() {
    dotenv().ok();

    // 记录程序启动时间
    let started_at = chrono::Utc::now();

    // 初始化配置
    setup_panic!();
    if let Err(e) = AppConfig::init() {
        eprintln!("Failed to initialize configuration: {e}");
        std::process::exit(1);
    }
    let config = AppConfig::get();

    // 初始化日志
    let stdout_log = std::io::stdout();
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    // 打印信息
    warn!(
        "Starting {}...
        Project: {}
        Version: {}
        Authors: {}",
        config.app.system_name,
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_AUTHORS")
    );

    let startup = match lifetime::startup::prepare_engine_startup().await {
        Ok(startup) => startup,
        Err(e) => {
            error!("Engine startup failed: {}", e);
            std::process::exit(1);
        }
    };

    debug!(
        "Pre-startup processing completed in {} ms",
        chrono::Utc::now()
            .signed_duration_since(started_at)
            .num_milliseconds()
    );

    let sweeper = lifetime::sweeper::run_sweeper(startup.engine.clone(), config.sweeper.clone());

    tokio::select! {
        _ = sweeper => {}
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Graceful shutdown: background tasks stopped");
        }
    }

    startup.audit.abort();
}
