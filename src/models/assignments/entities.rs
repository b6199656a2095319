use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{LmsError, Result};
use crate::utils::score::SCORE_SCALE;

/// 作业
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub course_version_id: i64,
    pub lesson_id: Option<i64>,
    pub title: String,
    pub total_points: f64,
    pub time_limit_minutes: Option<i32>,
    /// 为空或 <= 0 表示不限次数
    pub max_attempts: Option<i32>,
    pub due_at: Option<DateTime<Utc>>,
}

impl Assignment {
    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.due_at.is_some_and(|due| now > due)
    }

    pub fn attempt_limit(&self) -> Option<i64> {
        self.max_attempts.filter(|m| *m > 0).map(i64::from)
    }

    /// 可给出的最高分；未配置满分时按 0–10 刻度
    pub fn max_score(&self) -> f64 {
        if self.total_points > 0.0 {
            self.total_points
        } else {
            SCORE_SCALE
        }
    }

    /// 分数必须在 [0, max_score] 内
    pub fn validate_score(&self, score: f64) -> Result<()> {
        let max = self.max_score();
        if !score.is_finite() || score < 0.0 || score > max {
            return Err(LmsError::validation(format!(
                "score {score} is outside [0, {max}] for assignment {}",
                self.id
            )));
        }
        Ok(())
    }
}

string_enum! {
    /// 提交状态
    pub enum SubmissionStatus("提交状态") {
        Pending => "pending",   // 待批改
        Graded => "graded",     // 已批改
        Rejected => "rejected", // 已退回
    }
}

impl SubmissionStatus {
    /// 成绩已确定（批改或退回）后不可再修改内容
    pub fn is_finalized(self) -> bool {
        self != SubmissionStatus::Pending
    }
}

/// 作业提交
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub enrollment_id: i64,
    pub attempt_number: i32,
    pub previous_submission_id: Option<i64>,
    pub content: String,
    pub status: SubmissionStatus,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub graded_at: Option<DateTime<Utc>>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        let assignment = Assignment {
            id: 4,
            course_version_id: 1,
            lesson_id: None,
            title: "essay".into(),
            total_points: 20.0,
            time_limit_minutes: None,
            max_attempts: Some(2),
            due_at: None,
        };
        assert!(assignment.validate_score(0.0).is_ok());
        assert!(assignment.validate_score(20.0).is_ok());
        assert!(assignment.validate_score(20.5).is_err());
        assert!(assignment.validate_score(-1.0).is_err());
        assert!(assignment.validate_score(f64::NAN).is_err());
        assert_eq!(assignment.attempt_limit(), Some(2));
    }

    #[test]
    fn test_unconfigured_total_uses_ten_point_scale() {
        let assignment = Assignment {
            id: 5,
            course_version_id: 1,
            lesson_id: None,
            title: "reflection".into(),
            total_points: 0.0,
            time_limit_minutes: None,
            max_attempts: None,
            due_at: None,
        };
        assert_eq!(assignment.max_score(), 10.0);
        assert!(assignment.validate_score(7.5).is_ok());
        assert!(assignment.validate_score(10.0).is_ok());
        assert!(assignment.validate_score(10.5).is_err());
        assert_eq!(assignment.attempt_limit(), None);
    }
}
