//! 定时清扫：到期选课与超时作答

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error};

use crate::config::SweeperConfig;
use crate::services::LearningEngine;

/// 执行一轮清扫并清理空闲锁，返回 (过期选课数, 过期作答数)
pub async fn sweep_once(engine: &LearningEngine) -> (usize, usize) {
    let enrollments = engine.enrollments.sweep_expired().await.unwrap_or_else(|e| {
        error!("Enrollment expiry sweep failed: {}", e);
        0
    });
    let attempts = engine.quizzes.sweep_timed_out().await.unwrap_or_else(|e| {
        error!("Quiz attempt sweep failed: {}", e);
        0
    });
    let pruned = engine.context().locks.prune();
    if pruned > 0 {
        debug!("Pruned {} idle lock(s)", pruned);
    }
    (enrollments, attempts)
}

pub async fn run_sweeper(engine: Arc<LearningEngine>, config: SweeperConfig) {
    if !config.enabled {
        debug!("Sweeper disabled, waiting for shutdown");
        std::future::pending::<()>().await;
    }

    let mut ticker = interval(Duration::from_secs(config.interval_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let (enrollments, attempts) = sweep_once(&engine).await;
        debug!(
            "Sweep tick: {} enrollment(s), {} attempt(s) expired",
            enrollments, attempts
        );
    }
}
