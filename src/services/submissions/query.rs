use std::collections::HashMap;

use super::SubmissionService;
use super::submit::load_assignment;
use crate::errors::{LmsError, Result};
use crate::models::Principal;
use crate::models::assignments::entities::{Submission, SubmissionStatus};
use crate::utils::score::{normalize, percentage};

/// 已批改提交中得分最高的一条，同分取较早的
pub fn best_of(submissions: &[Submission]) -> Option<&Submission> {
    submissions
        .iter()
        .filter(|s| s.status == SubmissionStatus::Graded)
        .filter(|s| s.score.is_some())
        .fold(None, |best: Option<&Submission>, s| match best {
            Some(b) if b.score >= s.score => Some(b),
            _ => Some(s),
        })
}

pub async fn best_submission(
    service: &SubmissionService,
    principal: &Principal,
    assignment_id: i64,
    student_id: i64,
) -> Result<Option<Submission>> {
    let submissions = list_submissions(service, principal, assignment_id, student_id).await?;
    Ok(best_of(&submissions).cloned())
}

pub async fn list_submissions(
    service: &SubmissionService,
    principal: &Principal,
    assignment_id: i64,
    student_id: i64,
) -> Result<Vec<Submission>> {
    principal.ensure_can_view(student_id)?;
    let ctx = service.ctx();
    load_assignment(ctx, assignment_id).await?;
    ctx.storage.list_submissions(assignment_id, student_id).await
}

/// 已批改提交中及格的比例（百分比），没有已批改提交时为空
///
/// 换算到 0–10 刻度后与所属选课的及格线比较。
pub async fn passing_rate(
    service: &SubmissionService,
    principal: &Principal,
    assignment_id: i64,
) -> Result<Option<f64>> {
    let ctx = service.ctx();
    let assignment = load_assignment(ctx, assignment_id).await?;
    ctx.ensure_teaches_version(principal, assignment.course_version_id)
        .await?;

    let graded: Vec<Submission> = ctx
        .storage
        .list_submissions_by_assignment(assignment_id)
        .await?
        .into_iter()
        .filter(|s| s.status == SubmissionStatus::Graded)
        .collect();
    if graded.is_empty() {
        return Ok(None);
    }

    let mut pass_scores: HashMap<i64, f64> = HashMap::new();
    let mut passing = 0;
    for submission in &graded {
        let pass_score = match pass_scores.get(&submission.enrollment_id) {
            Some(pass_score) => *pass_score,
            None => {
                let enrollment = ctx
                    .storage
                    .get_enrollment_by_id(submission.enrollment_id)
                    .await?
                    .ok_or_else(|| {
                        LmsError::not_found(format!("enrollment {}", submission.enrollment_id))
                    })?;
                pass_scores.insert(enrollment.id, enrollment.pass_score);
                enrollment.pass_score
            }
        };
        let score = normalize(submission.score.unwrap_or(0.0), assignment.total_points);
        if score >= pass_score {
            passing += 1;
        }
    }
    Ok(Some(percentage(passing as f64, graded.len() as f64)))
}
