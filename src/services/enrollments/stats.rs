use super::EnrollmentService;
use crate::errors::Result;
use crate::models::Principal;
use crate::models::enrollments::{
    entities::{Enrollment, EnrollmentStatus},
    responses::EnrollmentStats,
};
use crate::utils::score::{percentage, round2};

/// 平均值，空集合为 None
pub(crate) fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| round2(sum / count as f64))
}

pub fn summarize(course_id: i64, enrollments: &[Enrollment]) -> EnrollmentStats {
    let count = |status: EnrollmentStatus| {
        enrollments.iter().filter(|e| e.status == status).count()
    };
    let total = enrollments.len();
    let completed = count(EnrollmentStatus::Completed);

    EnrollmentStats {
        course_id,
        total_enrollments: total,
        active_enrollments: count(EnrollmentStatus::Enrolled),
        completed_enrollments: completed,
        cancelled_enrollments: count(EnrollmentStatus::Cancelled),
        expired_enrollments: count(EnrollmentStatus::Expired),
        banned_enrollments: count(EnrollmentStatus::Banned),
        completion_rate: percentage(completed as f64, total as f64),
        average_completion_percentage: mean(
            enrollments.iter().map(|e| e.completion_percentage),
        )
        .unwrap_or(0.0),
        average_score: mean(enrollments.iter().filter_map(|e| e.average_score)),
        certificates_issued: enrollments.iter().filter(|e| e.certificate_issued).count(),
    }
}

pub async fn enrollment_stats(
    service: &EnrollmentService,
    principal: &Principal,
    course_id: i64,
) -> Result<EnrollmentStats> {
    let ctx = service.ctx();
    ctx.ensure_teaches_course(principal, course_id).await?;
    let enrollments = ctx.storage.list_enrollments_by_course(course_id).await?;
    Ok(summarize(course_id, &enrollments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn enrollment(
        id: i64,
        status: EnrollmentStatus,
        completion: f64,
        score: Option<f64>,
    ) -> Enrollment {
        let now = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        Enrollment {
            id,
            student_id: id,
            course_id: 10,
            course_version_id: 1,
            status,
            enrolled_at: now,
            start_at: now,
            end_at: None,
            completion_percentage: completion,
            average_score: score,
            final_exam_score: None,
            final_exam_weight: 0.0,
            pass_score: 5.0,
            min_progress_pct: 0.0,
            certificate_issued: status == EnrollmentStatus::Completed,
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
    fn test_summarize_counts_by_status() {
        let stats = summarize(
            10,
            &[
                enrollment(1, EnrollmentStatus::Completed, 100.0, Some(8.0)),
                enrollment(2, EnrollmentStatus::Enrolled, 50.0, Some(6.0)),
                enrollment(3, EnrollmentStatus::Enrolled, 0.0, None),
                enrollment(4, EnrollmentStatus::Cancelled, 10.0, None),
            ],
        );
        assert_eq!(stats.total_enrollments, 4);
        assert_eq!(stats.active_enrollments, 2);
        assert_eq!(stats.completed_enrollments, 1);
        assert_eq!(stats.cancelled_enrollments, 1);
        assert_eq!(stats.completion_rate, 25.0);
        assert_eq!(stats.average_completion_percentage, 40.0);
        assert_eq!(stats.average_score, Some(7.0));
        assert_eq!(stats.certificates_issued, 1);
    }

    #[test]
    fn test_empty_course() {
        let stats = summarize(10, &[]);
        assert_eq!(stats.total_enrollments, 0);
        assert_eq!(stats.completion_rate, 0.0);
        assert_eq!(stats.average_score, None);
    }
}
