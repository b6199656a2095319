use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::score::percentage;

string_enum! {
    /// 课时学习状态
    pub enum ProgressStatus("学习状态") {
        NotStarted => "not_started",
        InProgress => "in_progress",
        Completed => "completed",
    }
}

/// 单个课时的学习进度（每个选课 + 课时一条）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub id: i64,
    pub enrollment_id: i64,
    pub student_id: i64,
    pub lesson_id: i64,
    pub status: ProgressStatus,
    pub viewed_at: Option<DateTime<Utc>>,
    pub times_viewed: i32,
    pub watched_duration_seconds: i64,
    pub watched_percentage: f64,
    pub completed_at: Option<DateTime<Utc>>,
    pub is_bookmarked: bool,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Progress {
    /// 尚未持久化的新进度（id 为 0）
    pub fn new(enrollment_id: i64, student_id: i64, lesson_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            enrollment_id,
            student_id,
            lesson_id,
            status: ProgressStatus::NotStarted,
            viewed_at: None,
            times_viewed: 0,
            watched_duration_seconds: 0,
            watched_percentage: 0.0,
            completed_at: None,
            is_bookmarked: false,
            notes: None,
            updated_at: now,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }

    pub fn is_completed(&self) -> bool {
        self.status == ProgressStatus::Completed
    }

    /// 记录一次观看
    pub fn record_view(&mut self, now: DateTime<Utc>) {
        self.times_viewed += 1;
        self.viewed_at = Some(now);
        if self.status == ProgressStatus::NotStarted {
            self.status = ProgressStatus::InProgress;
        }
        self.updated_at = now;
    }

    /// 更新观看时长（只增不减），返回是否因此跨过完成阈值
    pub fn apply_watched_duration(
        &mut self,
        seconds: i64,
        lesson_duration_seconds: i64,
        threshold_pct: f64,
        now: DateTime<Utc>,
    ) -> bool {
        self.watched_duration_seconds = self.watched_duration_seconds.max(seconds);
        self.watched_percentage =
            watched_percentage(self.watched_duration_seconds, lesson_duration_seconds);
        if self.viewed_at.is_none() {
            self.viewed_at = Some(now);
        }
        if self.status == ProgressStatus::NotStarted {
            self.status = ProgressStatus::InProgress;
        }
        self.updated_at = now;

        if self.watched_percentage >= threshold_pct && !self.is_completed() {
            self.mark_completed(now);
            return true;
        }
        false
    }

    /// 标记完成，已完成时返回 false
    pub fn mark_completed(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_completed() {
            return false;
        }
        self.status = ProgressStatus::Completed;
        self.completed_at = Some(now);
        if self.viewed_at.is_none() {
            self.viewed_at = Some(now);
        }
        self.updated_at = now;
        true
    }
}

/// 观看百分比：时长为 0 的课时只要有观看即视为 100%
pub fn watched_percentage(watched_seconds: i64, lesson_duration_seconds: i64) -> f64 {
    if lesson_duration_seconds > 0 {
        percentage(watched_seconds as f64, lesson_duration_seconds as f64)
    } else if watched_seconds > 0 {
        100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_watched_percentage() {
        assert_eq!(watched_percentage(50, 100), 50.0);
        assert_eq!(watched_percentage(250, 100), 100.0);
        assert_eq!(watched_percentage(1, 0), 100.0);
        assert_eq!(watched_percentage(0, 0), 0.0);
    }

    #[test]
    fn test_watched_duration_is_monotonic() {
        let mut p = Progress::new(1, 7, 11, now());
        assert!(!p.apply_watched_duration(70, 100, 90.0, now()));
        assert!(!p.apply_watched_duration(50, 100, 90.0, now()));
        assert_eq!(p.watched_duration_seconds, 70);
        assert_eq!(p.watched_percentage, 70.0);
        assert_eq!(p.status, ProgressStatus::InProgress);
    }

    #[test]
    fn test_crossing_threshold_completes_once() {
        let mut p = Progress::new(1, 7, 11, now());
        assert!(p.apply_watched_duration(95, 100, 90.0, now()));
        assert!(p.is_completed());
        assert_eq!(p.completed_at, Some(now()));
        assert!(!p.apply_watched_duration(100, 100, 90.0, now()));
    }

    #[test]
    fn test_record_view_counts() {
        let mut p = Progress::new(1, 7, 11, now());
        p.record_view(now());
        p.record_view(now());
        assert_eq!(p.times_viewed, 2);
        assert_eq!(p.status, ProgressStatus::InProgress);
    }
}
