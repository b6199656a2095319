use serde::{Deserialize, Serialize};

use super::entities::QuestionType;

/// 呈现给学生的选项（不含正确答案）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentedOption {
    pub id: i64,
    pub content: String,
}

/// 呈现给学生的题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentedQuestion {
    pub question_id: i64,
    pub question_type: QuestionType,
    pub content: String,
    pub points: f64,
    pub options: Vec<PresentedOption>,
}

/// 某次作答的试卷视图，顺序由作答种子决定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentedQuiz {
    pub attempt_id: i64,
    pub quiz_id: i64,
    pub title: String,
    pub remaining_seconds: Option<i64>,
    pub questions: Vec<PresentedQuestion>,
}
