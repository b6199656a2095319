use std::collections::HashSet;

use super::ProgressService;
use crate::errors::Result;
use crate::models::Principal;
use crate::models::enrollments::entities::EnrollmentStatus;
use crate::models::progress::{entities::ProgressStatus, responses::CourseProgressStats};
use crate::services::enrollments::stats::mean;

/// 课程维度的学习进度统计，平均值基于选课上的物化字段
pub async fn course_progress_stats(
    service: &ProgressService,
    principal: &Principal,
    course_id: i64,
) -> Result<CourseProgressStats> {
    let ctx = service.ctx();
    ctx.ensure_teaches_course(principal, course_id).await?;
    let enrollments = ctx.storage.list_enrollments_by_course(course_id).await?;

    let mut enrolled = HashSet::new();
    let mut with_progress = HashSet::new();
    let mut completed = HashSet::new();
    for enrollment in &enrollments {
        enrolled.insert(enrollment.student_id);
        if enrollment.status == EnrollmentStatus::Completed {
            completed.insert(enrollment.student_id);
        }
        if with_progress.contains(&enrollment.student_id) {
            continue;
        }
        let started = ctx
            .storage
            .list_progress_by_enrollment(enrollment.id)
            .await?
            .iter()
            .any(|p| p.status != ProgressStatus::NotStarted);
        if started {
            with_progress.insert(enrollment.student_id);
        }
    }

    Ok(CourseProgressStats {
        course_id,
        total_enrolled_students: enrolled.len(),
        students_with_progress: with_progress.len(),
        students_completed: completed.len(),
        average_completion_percentage: mean(
            enrollments.iter().map(|e| e.completion_percentage),
        )
        .unwrap_or(0.0),
        average_score: mean(enrollments.iter().filter_map(|e| e.average_score)),
    })
}
