use chrono::{DateTime, Utc};

use crate::models::courses::entities::GradingPolicy;

/// 新建选课
#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub student_id: i64,
    pub course_id: i64,
    pub course_version_id: i64,
    pub policy: GradingPolicy,
    pub payment_transaction_id: Option<i64>,
    pub enrolled_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
}
