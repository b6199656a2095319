use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, RwLock};

/// 时钟抽象
///
/// 引擎中所有 "now" 都从这里取，测试可使用手动时钟推进时间，
/// 用于验证选课过期与测验限时。
#[derive(Debug, Clone, Default)]
pub enum Clock {
    #[default]
    System,
    Manual(Arc<RwLock<DateTime<Utc>>>),
}

impl Clock {
    /// 系统时钟
    pub fn system() -> Self {
        Self::System
    }

    /// 停在指定时刻的手动时钟，克隆体共享同一时间
    pub fn manual(at: DateTime<Utc>) -> Self {
        Self::Manual(Arc::new(RwLock::new(at)))
    }

    /// 当前时间（秒级精度，与持久化的时间戳一致）
    pub fn now(&self) -> DateTime<Utc> {
        let now = match self {
            Clock::System => Utc::now(),
            Clock::Manual(at) => match at.read() {
                Ok(guard) => *guard,
                Err(poisoned) => *poisoned.into_inner(),
            },
        };
        DateTime::<Utc>::from_timestamp(now.timestamp(), 0).unwrap_or(now)
    }

    /// 推进手动时钟，对系统时钟无效
    pub fn advance(&self, delta: Duration) {
        if let Clock::Manual(at) = self {
            match at.write() {
                Ok(mut guard) => *guard += delta,
                Err(poisoned) => *poisoned.into_inner() += delta,
            }
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, Clock::Manual(_))
    }
}

/// 测试用固定时间戳 (2023-11-14T22:13:20Z)
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// 停在固定时间戳的手动时钟
pub fn fixed_clock() -> Clock {
    Clock::manual(DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_shared_between_clones() {
        let clock = fixed_clock();
        let other = clock.clone();
        clock.advance(Duration::minutes(5));
        assert_eq!(other.now().timestamp(), FIXED_TEST_TIMESTAMP + 300);
    }

    #[test]
    fn test_system_clock_ignores_advance() {
        let clock = Clock::system();
        let before = clock.now();
        clock.advance(Duration::days(365));
        assert!(clock.now() - before < Duration::days(1));
        assert!(!clock.is_manual());
    }
}
