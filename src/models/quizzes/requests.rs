use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 提交单题答案
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitAnswerRequest {
    #[serde(default)]
    pub selected_option_ids: Vec<i64>,
    pub text_answer: Option<String>,
}

impl SubmitAnswerRequest {
    pub fn options(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            selected_option_ids: ids.into_iter().collect(),
            text_answer: None,
        }
    }

    pub fn text(answer: impl Into<String>) -> Self {
        Self {
            selected_option_ids: Vec::new(),
            text_answer: Some(answer.into()),
        }
    }
}

/// 人工评分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeAnswerRequest {
    pub score: f64,
    pub feedback: Option<String>,
}

/// 新建作答
#[derive(Debug, Clone)]
pub struct NewQuizAttempt {
    pub quiz_id: i64,
    pub student_id: i64,
    pub enrollment_id: i64,
    pub attempt_number: i32,
    pub started_at: DateTime<Utc>,
    pub shuffle_seed: u64,
}
