use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    #[serde(default)]
    pub learning: LearningConfig,
    pub sweeper: SweeperConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,    // 数据库连接 URL（从 scheme 自动推断类型）
    pub pool_size: u32, // 连接池大小
    pub timeout: u64,   // 连接超时 (秒)
}

/// 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub default_ttl: u64,
    pub memory: MemoryConfig,
}

/// 内存缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    pub max_capacity: u64,
}

/// 成绩聚合方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreAggregation {
    /// 所有已评分的尝试都计入平均分
    #[default]
    AllAttempts,
    /// 每个测验/作业只取最高分
    BestAttempt,
}

/// 学习引擎策略
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningConfig {
    /// 观看百分比达到该阈值时课时自动完成
    pub completion_threshold_pct: f64,
    /// 乐观锁冲突的内部重试次数
    pub max_conflict_retries: u32,
    pub score_aggregation: ScoreAggregation,
    /// 领域事件广播通道容量
    pub event_buffer: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            completion_threshold_pct: 90.0,
            max_conflict_retries: 3,
            score_aggregation: ScoreAggregation::AllAttempts,
            event_buffer: 256,
        }
    }
}

/// 过期清扫任务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweeperConfig {
    pub enabled: bool,
    pub interval_secs: u64,
}
