//! 成绩计算（纯函数）

use std::collections::HashMap;

use crate::config::ScoreAggregation;
use crate::models::assignments::entities::{Assignment, Submission, SubmissionStatus};
use crate::models::enrollments::{
    entities::Enrollment,
    responses::{FinalExamEligibility, GradeSummary},
};
use crate::models::quizzes::entities::{Quiz, QuizAttempt, QuizAttemptStatus};
use crate::utils::score::{normalize, round2};

/// 某个选课的全部评分来源
#[derive(Debug, Clone, Copy)]
pub struct GradingInputs<'a> {
    pub quizzes: &'a [Quiz],
    pub attempts: &'a [QuizAttempt],
    pub assignments: &'a [Assignment],
    pub submissions: &'a [Submission],
}

/// 同一来源的多个分数按聚合方式合并
fn collapse(
    scores: HashMap<i64, Vec<(i32, f64)>>,
    aggregation: ScoreAggregation,
    latest_only: bool,
) -> Vec<f64> {
    let mut collapsed = Vec::new();
    for (_, mut entries) in scores {
        entries.sort_by_key(|(number, _)| *number);
        match aggregation {
            ScoreAggregation::BestAttempt => {
                if let Some(best) = entries.iter().map(|(_, s)| *s).reduce(f64::max) {
                    collapsed.push(best);
                }
            }
            ScoreAggregation::AllAttempts if latest_only => {
                if let Some((_, latest)) = entries.last() {
                    collapsed.push(*latest);
                }
            }
            ScoreAggregation::AllAttempts => collapsed.extend(entries.iter().map(|(_, s)| *s)),
        }
    }
    collapsed
}

/// 已评分测验作答的 0–10 分，按测验分组
fn graded_attempts(inputs: &GradingInputs<'_>, final_exam: bool) -> HashMap<i64, Vec<(i32, f64)>> {
    let quizzes: HashMap<i64, &Quiz> = inputs.quizzes.iter().map(|q| (q.id, q)).collect();
    let mut grouped: HashMap<i64, Vec<(i32, f64)>> = HashMap::new();

    for attempt in inputs.attempts {
        if attempt.status != QuizAttemptStatus::Graded {
            continue;
        }
        let (Some(quiz), Some(total)) = (quizzes.get(&attempt.quiz_id), attempt.total_score)
        else {
            continue;
        };
        if quiz.is_final_exam != final_exam {
            continue;
        }
        grouped
            .entry(quiz.id)
            .or_default()
            .push((attempt.attempt_number, normalize(total, quiz.max_points())));
    }
    grouped
}

/// 平时成绩各项（0–10）：非期末测验与已批改作业
pub fn coursework_scores(inputs: &GradingInputs<'_>, aggregation: ScoreAggregation) -> Vec<f64> {
    let mut scores = collapse(graded_attempts(inputs, false), aggregation, false);

    let assignments: HashMap<i64, &Assignment> =
        inputs.assignments.iter().map(|a| (a.id, a)).collect();
    let mut grouped: HashMap<i64, Vec<(i32, f64)>> = HashMap::new();
    for submission in inputs.submissions {
        if submission.status != SubmissionStatus::Graded {
            continue;
        }
        let (Some(assignment), Some(score)) =
            (assignments.get(&submission.assignment_id), submission.score)
        else {
            continue;
        };
        grouped
            .entry(assignment.id)
            .or_default()
            .push((submission.attempt_number, normalize(score, assignment.total_points)));
    }
    scores.extend(collapse(grouped, aggregation, false));
    scores
}

/// 期末考试成绩：默认取最近一次已评分作答，BestAttempt 取最高
pub fn final_exam_scores(inputs: &GradingInputs<'_>, aggregation: ScoreAggregation) -> Vec<f64> {
    collapse(graded_attempts(inputs, true), aggregation, true)
}

pub fn average(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    Some(round2(scores.iter().sum::<f64>() / scores.len() as f64))
}

/// 平时 × (1 − 权重) + 期末 × 权重，缺失项按 0 计
pub fn weighted_final_score(coursework: Option<f64>, final_exam: Option<f64>, weight: f64) -> f64 {
    let weight = weight.clamp(0.0, 1.0);
    round2(coursework.unwrap_or(0.0) * (1.0 - weight) + final_exam.unwrap_or(0.0) * weight)
}

pub fn eligibility(current_pct: f64, required_pct: f64) -> FinalExamEligibility {
    let is_eligible = current_pct >= required_pct;
    FinalExamEligibility {
        is_eligible,
        reason: (!is_eligible).then(|| {
            format!("insufficient progress: current {current_pct}% < required {required_pct}%")
        }),
        current_progress_pct: current_pct,
        required_progress_pct: required_pct,
    }
}

pub fn summarize(
    enrollment: &Enrollment,
    completion_percentage: f64,
    inputs: &GradingInputs<'_>,
    aggregation: ScoreAggregation,
) -> GradeSummary {
    let coursework = coursework_scores(inputs, aggregation);
    let finals = final_exam_scores(inputs, aggregation);

    // 课程没有期末考试时权重不生效
    let effective_final_weight = if inputs.quizzes.iter().any(|q| q.is_final_exam) {
        enrollment.final_exam_weight
    } else {
        0.0
    };

    let coursework_average = average(&coursework);
    let final_exam_score = average(&finals);
    let final_score =
        weighted_final_score(coursework_average, final_exam_score, effective_final_weight);

    GradeSummary {
        enrollment_id: enrollment.id,
        coursework_average,
        final_exam_score,
        effective_final_weight,
        final_score,
        completion_percentage,
        pass_score: enrollment.pass_score,
        is_passing: final_score >= enrollment.pass_score
            && completion_percentage >= enrollment.min_progress_pct,
        graded_items: coursework.len() + finals.len(),
    }
}
