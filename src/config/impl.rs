use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 内置默认值，配置文件和环境变量可逐项覆盖
            .set_default("app.system_name", "LMS Learning Engine")?
            .set_default("app.environment", "development")?
            .set_default("app.log_level", "info")?
            .set_default("database.url", "lms.db")?
            .set_default("database.pool_size", 8)?
            .set_default("database.timeout", 10)?
            .set_default("cache.default_ttl", 300)?
            .set_default("cache.memory.max_capacity", 1024)?
            .set_default("learning.completion_threshold_pct", 90.0)?
            .set_default("learning.max_conflict_retries", 3)?
            .set_default("learning.score_aggregation", "all_attempts")?
            .set_default("learning.event_buffer", 256)?
            .set_default("sweeper.enabled", true)?
            .set_default("sweeper.interval_secs", 60)?
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 最后加载环境变量覆盖
            .add_source(
                Environment::with_prefix("LMS")
                    .separator("__")
                    .try_parsing(true),
            );

        // 支持从环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option(
                "sweeper.interval_secs",
                std::env::var("SWEEP_INTERVAL").ok(),
            )?;

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;

        Ok(app_config)
    }

    /// 校验策略取值范围
    fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.learning.completion_threshold_pct;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ConfigError::Message(format!(
                "learning.completion_threshold_pct must be within [0, 100], got {threshold}"
            )));
        }
        if self.sweeper.enabled && self.sweeper.interval_secs == 0 {
            return Err(ConfigError::Message(
                "sweeper.interval_secs must be positive when the sweeper is enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }
}
