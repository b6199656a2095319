use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 新建提交
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub student_id: i64,
    pub enrollment_id: i64,
    pub attempt_number: i32,
    pub previous_submission_id: Option<i64>,
    pub content: String,
    pub submitted_at: DateTime<Utc>,
}

/// 批改提交
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeSubmissionRequest {
    pub score: f64,
    pub feedback: Option<String>,
}
