//! 按键串行化的异步锁
//!
//! 同一选课的派生字段更新、同一 (测验, 学生) 的开始作答、
//! 同一 (学生, 课程) 的选课都需要串行执行。

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// 串行化键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockKey {
    Enrollment(i64),
    QuizStudent { quiz_id: i64, student_id: i64 },
    StudentCourse { student_id: i64, course_id: i64 },
}

#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: DashMap<LockKey, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取指定键的锁，持有返回的 guard 期间同键操作排队
    pub async fn lock(&self, key: LockKey) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// 清理当前无人持有的锁条目
    pub fn prune(&self) -> usize {
        let before = self.locks.len();
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - self.locks.len()
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_serialized() {
        let locks = Arc::new(KeyedLocks::new());
        let guard = locks.lock(LockKey::Enrollment(1)).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock(LockKey::Enrollment(1)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_block() {
        let locks = KeyedLocks::new();
        let _a = locks.lock(LockKey::Enrollment(1)).await;
        let _b = locks.lock(LockKey::Enrollment(2)).await;
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_prune_removes_idle_entries() {
        let locks = KeyedLocks::new();
        let held = locks
            .lock(LockKey::QuizStudent {
                quiz_id: 3,
                student_id: 4,
            })
            .await;
        drop(locks.lock(LockKey::Enrollment(9)).await);
        assert_eq!(locks.prune(), 1);
        assert_eq!(locks.len(), 1);
        drop(held);
        assert_eq!(locks.prune(), 1);
        assert!(locks.is_empty());
    }
}
