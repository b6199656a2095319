use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{LmsError, Result};
use crate::models::courses::entities::GradingPolicy;

string_enum! {
    /// 选课状态
    ///
    /// `Enrolled` 是唯一的非终止状态。
    pub enum EnrollmentStatus("选课状态") {
        Enrolled => "enrolled",   // 学习中
        Completed => "completed", // 已完成
        Cancelled => "cancelled", // 已取消
        Expired => "expired",     // 已过期
        Banned => "banned",       // 已封禁
    }
}

impl EnrollmentStatus {
    /// 状态迁移表
    pub fn can_transition_to(self, next: EnrollmentStatus) -> bool {
        use EnrollmentStatus::*;
        matches!(
            (self, next),
            (Enrolled, Completed) | (Enrolled, Cancelled) | (Enrolled, Expired) | (Enrolled, Banned)
        )
    }

    pub fn is_terminal(self) -> bool {
        self != EnrollmentStatus::Enrolled
    }
}

/// 选课记录（学生与课程版本关系的聚合根）
///
/// completion_percentage / average_score / final_exam_score 是由子记录
/// 计算出的物化缓存，只能由重算流程写入。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub course_version_id: i64,
    pub status: EnrollmentStatus,
    pub enrolled_at: DateTime<Utc>,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    pub completion_percentage: f64,
    /// 加权后的最终成绩（与及格线比较的值）
    pub average_score: Option<f64>,
    pub final_exam_score: Option<f64>,
    pub final_exam_weight: f64,
    pub pass_score: f64,
    pub min_progress_pct: f64,
    pub certificate_issued: bool,
    pub certificate_id: Option<i64>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub ban_reason: Option<String>,
    pub banned_at: Option<DateTime<Utc>>,
    pub payment_transaction_id: Option<i64>,
    /// 乐观锁版本号
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enrollment {
    /// 选课时的评分策略快照
    pub fn policy(&self) -> GradingPolicy {
        GradingPolicy {
            pass_score: self.pass_score,
            final_weight: self.final_exam_weight,
            min_progress_pct: self.min_progress_pct,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == EnrollmentStatus::Enrolled
    }

    /// 学习中且已超过截止时间
    pub fn is_due_for_expiry(&self, now: DateTime<Utc>) -> bool {
        self.status == EnrollmentStatus::Enrolled && self.end_at.is_some_and(|end| end < now)
    }

    /// 子记录写入前的状态检查
    pub fn ensure_writable(&self) -> Result<()> {
        match self.status {
            EnrollmentStatus::Enrolled => Ok(()),
            EnrollmentStatus::Expired => Err(LmsError::enrollment_expired(format!(
                "enrollment {} expired at {}",
                self.id,
                self.end_at.map(|t| t.to_rfc3339()).unwrap_or_default()
            ))),
            status => Err(LmsError::enrollment_not_active(format!(
                "enrollment {} is {status}",
                self.id
            ))),
        }
    }

    /// 执行状态迁移并写入对应的时间戳
    pub fn transition_to(&mut self, next: EnrollmentStatus, now: DateTime<Utc>) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(LmsError::invalid_transition(format!(
                "enrollment {} cannot move from {} to {next}",
                self.id, self.status
            )));
        }
        match next {
            EnrollmentStatus::Completed => self.completed_at = Some(now),
            EnrollmentStatus::Cancelled => self.cancelled_at = Some(now),
            EnrollmentStatus::Banned => self.banned_at = Some(now),
            EnrollmentStatus::Expired | EnrollmentStatus::Enrolled => {}
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment(end_at: Option<DateTime<Utc>>) -> Enrollment {
        let now = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        Enrollment {
            id: 1,
            student_id: 7,
            course_id: 3,
            course_version_id: 30,
            status: EnrollmentStatus::Enrolled,
            enrolled_at: now,
            start_at: now,
            end_at,
            completion_percentage: 0.0,
            average_score: None,
            final_exam_score: None,
            final_exam_weight: 0.6,
            pass_score: 8.0,
            min_progress_pct: 80.0,
            certificate_issued: false,
            certificate_id: None,
            completed_at: None,
            cancellation_reason: None,
            cancelled_at: None,
            ban_reason: None,
            banned_at: None,
            payment_transaction_id: None,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_transition_table() {
        use EnrollmentStatus::*;
        for next in [Completed, Cancelled, Expired, Banned] {
            assert!(Enrolled.can_transition_to(next));
        }
        for from in [Completed, Cancelled, Expired, Banned] {
            assert!(from.is_terminal());
            for next in EnrollmentStatus::ALL {
                assert!(!from.can_transition_to(*next), "{from} -> {next}");
            }
        }
        assert!(!Enrolled.can_transition_to(Enrolled));
    }

    #[test]
    fn test_transition_sets_timestamps() {
        let mut e = enrollment(None);
        let later = e.enrolled_at + chrono::Duration::days(2);
        e.transition_to(EnrollmentStatus::Banned, later).unwrap();
        assert_eq!(e.banned_at, Some(later));
        assert_eq!(e.status, EnrollmentStatus::Banned);

        let err = e
            .transition_to(EnrollmentStatus::Cancelled, later)
            .unwrap_err();
        assert_eq!(err.code(), "L001");
    }

    #[test]
    fn test_expiry_check() {
        let e = enrollment(None);
        assert!(!e.is_due_for_expiry(e.enrolled_at + chrono::Duration::days(10_000)));

        let end = e.enrolled_at + chrono::Duration::days(30);
        let e = enrollment(Some(end));
        assert!(!e.is_due_for_expiry(end));
        assert!(e.is_due_for_expiry(end + chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_writable_errors_by_status() {
        let mut e = enrollment(None);
        assert!(e.ensure_writable().is_ok());
        e.status = EnrollmentStatus::Expired;
        assert!(matches!(
            e.ensure_writable(),
            Err(LmsError::EnrollmentExpired(_))
        ));
        e.status = EnrollmentStatus::Completed;
        assert!(matches!(
            e.ensure_writable(),
            Err(LmsError::EnrollmentNotActive(_))
        ));
    }
}
