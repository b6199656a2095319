use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::{LmsError, Result};

string_enum! {
    /// 题目类型
    pub enum QuestionType("题目类型") {
        SingleChoice => "single_choice",
        MultipleChoice => "multiple_choice",
        TrueFalse => "true_false",
        ShortAnswer => "short_answer",
        Essay => "essay",
    }
}

impl QuestionType {
    /// 是否可以根据选项自动判分
    pub fn is_auto_gradable(self) -> bool {
        matches!(
            self,
            QuestionType::SingleChoice | QuestionType::MultipleChoice | QuestionType::TrueFalse
        )
    }

    /// 是否只允许选择一个选项
    pub fn is_single_select(self) -> bool {
        matches!(self, QuestionType::SingleChoice | QuestionType::TrueFalse)
    }
}

/// 答案选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: i64,
    pub question_id: i64,
    pub content: String,
    pub is_correct: bool,
    pub order_index: i32,
}

/// 测验题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: i64,
    pub quiz_id: i64,
    pub question_type: QuestionType,
    pub content: String,
    pub points: f64,
    pub order_index: i32,
    pub options: Vec<AnswerOption>,
}

impl QuizQuestion {
    pub fn has_option(&self, option_id: i64) -> bool {
        self.options.iter().any(|o| o.id == option_id)
    }

    /// 自动判分，主观题返回 None
    ///
    /// 单选/判断题选中唯一正确项得满分；多选题全对才得分。
    pub fn auto_grade(&self, selected_option_ids: &[i64]) -> Option<f64> {
        if !self.question_type.is_auto_gradable() {
            return None;
        }
        let correct: HashSet<i64> = self
            .options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| o.id)
            .collect();
        let selected: HashSet<i64> = selected_option_ids.iter().copied().collect();

        let is_correct = if self.question_type.is_single_select() {
            selected.len() == 1 && selected.is_subset(&correct)
        } else {
            !correct.is_empty() && selected == correct
        };
        Some(if is_correct { self.points } else { 0.0 })
    }

    /// 校验提交的答案形态是否与题型匹配
    pub fn validate_answer(&self, selected_option_ids: &[i64], text: Option<&str>) -> Result<()> {
        if let Some(unknown) = selected_option_ids.iter().find(|id| !self.has_option(**id)) {
            return Err(LmsError::validation(format!(
                "option {unknown} does not belong to question {}",
                self.id
            )));
        }
        if self.question_type.is_single_select() && selected_option_ids.len() > 1 {
            return Err(LmsError::validation(format!(
                "question {} accepts a single option",
                self.id
            )));
        }
        if !self.question_type.is_auto_gradable() && !selected_option_ids.is_empty() {
            return Err(LmsError::validation(format!(
                "question {} expects a text answer",
                self.id
            )));
        }
        if self.question_type.is_auto_gradable() && text.is_some_and(|t| !t.trim().is_empty()) {
            return Err(LmsError::validation(format!(
                "question {} expects selected options",
                self.id
            )));
        }
        Ok(())
    }
}

/// 测验
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub course_version_id: i64,
    pub lesson_id: Option<i64>,
    pub title: String,
    /// 为空或 <= 0 表示不限次数
    pub max_attempts: Option<i32>,
    pub time_limit_minutes: Option<i32>,
    pub passing_score: Option<f64>,
    pub randomize_questions: bool,
    pub randomize_options: bool,
    pub total_points: f64,
    pub is_final_exam: bool,
    pub questions: Vec<QuizQuestion>,
}

impl Quiz {
    pub fn question(&self, question_id: i64) -> Option<&QuizQuestion> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// 作答截止时间
    pub fn deadline(&self, started_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.time_limit_minutes
            .filter(|m| *m > 0)
            .map(|m| started_at + Duration::minutes(i64::from(m)))
    }

    /// 当前时间是否已超过限时
    pub fn is_overdue(&self, started_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.deadline(started_at).is_some_and(|deadline| now > deadline)
    }

    pub fn attempt_limit(&self) -> Option<i64> {
        self.max_attempts.filter(|m| *m > 0).map(i64::from)
    }

    /// 判分用的满分：未配置 total_points 时取题目分值之和
    pub fn max_points(&self) -> f64 {
        if self.total_points > 0.0 {
            self.total_points
        } else {
            self.questions.iter().map(|q| q.points).sum()
        }
    }
}

string_enum! {
    /// 测验作答状态
    pub enum QuizAttemptStatus("作答状态") {
        InProgress => "in_progress", // 作答中
        Submitted => "submitted",    // 已交卷，待人工评分
        Graded => "graded",          // 已评分
        Cancelled => "cancelled",    // 已放弃
        Expired => "expired",        // 已超时
    }
}

impl QuizAttemptStatus {
    /// 状态迁移表
    pub fn can_transition_to(self, next: QuizAttemptStatus) -> bool {
        use QuizAttemptStatus::*;
        matches!(
            (self, next),
            (InProgress, Submitted)
                | (InProgress, Graded)
                | (InProgress, Expired)
                | (InProgress, Cancelled)
                | (Submitted, Graded)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            QuizAttemptStatus::Graded | QuizAttemptStatus::Cancelled | QuizAttemptStatus::Expired
        )
    }
}

/// 一次测验作答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub id: i64,
    pub quiz_id: i64,
    pub student_id: i64,
    pub enrollment_id: i64,
    pub attempt_number: i32,
    pub status: QuizAttemptStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// 原始分（0..Quiz.total_points）
    pub total_score: Option<f64>,
    /// 题目/选项乱序的种子
    pub shuffle_seed: u64,
    pub updated_at: DateTime<Utc>,
}

impl QuizAttempt {
    pub fn transition_to(&mut self, next: QuizAttemptStatus, now: DateTime<Utc>) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(LmsError::invalid_transition(format!(
                "quiz attempt {} cannot move from {} to {next}",
                self.id, self.status
            )));
        }
        if self.status == QuizAttemptStatus::InProgress {
            self.finished_at = Some(now);
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }

    pub fn ensure_in_progress(&self) -> Result<()> {
        if self.status != QuizAttemptStatus::InProgress {
            return Err(LmsError::attempt_not_in_progress(format!(
                "quiz attempt {} is {}",
                self.id, self.status
            )));
        }
        Ok(())
    }
}

/// 单题作答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttemptAnswer {
    pub id: i64,
    pub attempt_id: i64,
    pub question_id: i64,
    pub selected_option_ids: Vec<i64>,
    pub text_answer: Option<String>,
    pub score: Option<f64>,
    pub is_graded: bool,
    pub graded_by: Option<i64>,
    pub feedback: Option<String>,
    pub answered_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: i64, is_correct: bool) -> AnswerOption {
        AnswerOption {
            id,
            question_id: 1,
            content: format!("option {id}"),
            is_correct,
            order_index: id as i32,
        }
    }

    fn question(question_type: QuestionType, options: Vec<AnswerOption>) -> QuizQuestion {
        QuizQuestion {
            id: 1,
            quiz_id: 1,
            question_type,
            content: "question".into(),
            points: 2.0,
            order_index: 0,
            options,
        }
    }

    #[test]
    fn test_single_choice_grading() {
        let q = question(
            QuestionType::SingleChoice,
            vec![option(1, false), option(2, true)],
        );
        assert_eq!(q.auto_grade(&[2]), Some(2.0));
        assert_eq!(q.auto_grade(&[1]), Some(0.0));
        assert_eq!(q.auto_grade(&[]), Some(0.0));
    }

    #[test]
    fn test_multiple_choice_is_all_or_nothing() {
        let q = question(
            QuestionType::MultipleChoice,
            vec![option(1, true), option(2, true), option(3, false)],
        );
        assert_eq!(q.auto_grade(&[2, 1]), Some(2.0));
        assert_eq!(q.auto_grade(&[1]), Some(0.0));
        assert_eq!(q.auto_grade(&[1, 2, 3]), Some(0.0));
    }

    #[test]
    fn test_essay_is_not_auto_graded() {
        let q = question(QuestionType::Essay, vec![]);
        assert_eq!(q.auto_grade(&[]), None);
        assert!(q.validate_answer(&[], Some("my essay")).is_ok());
        assert!(q.validate_answer(&[5], None).is_err());
    }

    #[test]
    fn test_answer_validation() {
        let q = question(
            QuestionType::TrueFalse,
            vec![option(1, true), option(2, false)],
        );
        assert!(q.validate_answer(&[1], None).is_ok());
        assert!(q.validate_answer(&[1, 2], None).is_err());
        assert!(q.validate_answer(&[9], None).is_err());
    }

    #[test]
    fn test_attempt_transition_table() {
        use QuizAttemptStatus::*;
        assert!(InProgress.can_transition_to(Graded));
        assert!(InProgress.can_transition_to(Submitted));
        assert!(Submitted.can_transition_to(Graded));
        assert!(!Submitted.can_transition_to(InProgress));
        assert!(!Graded.can_transition_to(Submitted));
        assert!(!Expired.can_transition_to(Graded));
        assert!(Expired.is_terminal() && Graded.is_terminal());
        assert!(!Submitted.is_terminal());
    }

    #[test]
    fn test_time_limit() {
        let quiz = Quiz {
            id: 1,
            course_version_id: 1,
            lesson_id: None,
            title: "quiz".into(),
            max_attempts: Some(0),
            time_limit_minutes: Some(30),
            passing_score: None,
            randomize_questions: false,
            randomize_options: false,
            total_points: 0.0,
            is_final_exam: false,
            questions: vec![],
        };
        let start = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        assert!(!quiz.is_overdue(start, start + Duration::minutes(30)));
        assert!(quiz.is_overdue(start, start + Duration::minutes(31)));
        assert_eq!(quiz.attempt_limit(), None);
    }
}
