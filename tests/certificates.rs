mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use common::*;
use rust_lms_next::collaborators::{CertificateIssuer, StorageCertificateIssuer};
use rust_lms_next::models::Principal;
use rust_lms_next::models::certificates::entities::{Certificate, CertificateStatus};
use rust_lms_next::models::enrollments::entities::{Enrollment, EnrollmentStatus};
use rust_lms_next::services::EngineContext;
use rust_lms_next::storage::{MemoryStorage, Storage};
use rust_lms_next::utils::fixed_clock;
use rust_lms_next::{LearningEngine, LmsError};

/// 在 `down` 为真时拒绝签发
struct SwitchableIssuer {
    down: AtomicBool,
    inner: StorageCertificateIssuer,
}

#[async_trait]
impl CertificateIssuer for SwitchableIssuer {
    async fn issue(
        &self,
        enrollment: &Enrollment,
        now: DateTime<Utc>,
    ) -> rust_lms_next::Result<Certificate> {
        if self.down.load(Ordering::SeqCst) {
            return Err(LmsError::collaborator("certificate service unavailable"));
        }
        self.inner.issue(enrollment, now).await
    }
}

fn harness_with_issuer(down: bool) -> (Harness, Arc<SwitchableIssuer>) {
    let storage = Arc::new(MemoryStorage::new());
    let issuer = Arc::new(SwitchableIssuer {
        down: AtomicBool::new(down),
        inner: StorageCertificateIssuer::new(storage.clone() as Arc<dyn Storage>),
    });
    let clock = fixed_clock();
    let context = EngineContext::builder(storage.clone())
        .clock(clock.clone())
        .certificate_issuer(issuer.clone())
        .build();
    let harness = Harness {
        storage,
        clock,
        engine: LearningEngine::new(context),
    };
    (harness, issuer)
}

/// 通过一次满分测验完成选课
async fn complete_course(h: &Harness, student_id: i64) -> Enrollment {
    let enrollment = h.enroll(student_id, 1).await;
    let quiz = choice_quiz(7, 1, 2);
    h.storage.add_quiz(quiz.clone());
    take_quiz(h, student_id, &quiz, 2).await;
    let completed = h.enrollment(enrollment.id).await;
    assert_eq!(completed.status, EnrollmentStatus::Completed);
    completed
}

#[tokio::test]
async fn test_missing_certificate_can_be_issued_later() {
    let (h, issuer) = harness_with_issuer(true);
    seed_course(&h.storage, 1, CourseSpec::default(), 1, 60);
    let enrollment = complete_course(&h, STUDENT).await;
    assert!(!enrollment.certificate_issued);

    let certificates = &h.engine.certificates;
    let student = Principal::student(STUDENT);

    let err = certificates
        .issue_certificate(&Principal::student(OTHER_STUDENT), enrollment.id)
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::Authorization(_)));
    let err = certificates
        .issue_certificate(&Principal::teacher(OTHER_TEACHER), enrollment.id)
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::Authorization(_)));

    let err = certificates
        .issue_certificate(&student, enrollment.id)
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::Collaborator(_)));
    assert!(!h.enrollment(enrollment.id).await.certificate_issued);

    issuer.down.store(false, Ordering::SeqCst);
    let mut events = h.engine.events().subscribe();
    let certificate = certificates
        .issue_certificate(&student, enrollment.id)
        .await
        .unwrap();
    assert!(certificate.code.starts_with("CERT-"));
    assert_eq!(certificate.enrollment_id, enrollment.id);

    let refreshed = h.enrollment(enrollment.id).await;
    assert!(refreshed.certificate_issued);
    assert_eq!(refreshed.certificate_id, Some(certificate.id));
    assert_eq!(
        events.try_recv().unwrap().event.name(),
        "certificate_issued"
    );

    let err = certificates
        .issue_certificate(&student, enrollment.id)
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::InvalidTransition(_)));
}

#[tokio::test]
async fn test_certificate_requires_completion() {
    let (h, _) = harness_with_issuer(false);
    seed_course(&h.storage, 1, CourseSpec::default(), 1, 60);
    let enrollment = h.enroll(STUDENT, 1).await;

    let err = h
        .engine
        .certificates
        .issue_certificate(&Principal::teacher(TEACHER), enrollment.id)
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::InvalidTransition(_)));
}

#[tokio::test]
async fn test_verify_and_revoke() {
    let (h, _) = harness_with_issuer(false);
    seed_course(&h.storage, 1, CourseSpec::default(), 1, 60);
    let enrollment = complete_course(&h, STUDENT).await;
    let certificates = &h.engine.certificates;
    let student = Principal::student(STUDENT);
    let teacher = Principal::teacher(TEACHER);

    let certificate = certificates
        .get_enrollment_certificate(&student, enrollment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(enrollment.certificate_id, Some(certificate.id));

    let verified = certificates.verify_certificate(&certificate.code).await.unwrap();
    assert!(verified.is_valid);
    assert_eq!(verified.status, CertificateStatus::Valid);
    assert_eq!(verified.student_id, STUDENT);
    assert_eq!(verified.final_score, 10.0);

    let err = certificates.verify_certificate("CERT-UNKNOWN").await.unwrap_err();
    assert!(matches!(err, LmsError::NotFound(_)));
    let err = certificates.verify_certificate("  ").await.unwrap_err();
    assert!(matches!(err, LmsError::Validation(_)));

    for principal in [student, Principal::teacher(OTHER_TEACHER)] {
        let err = certificates
            .revoke_certificate(&principal, certificate.id, "fraud")
            .await
            .unwrap_err();
        assert!(matches!(err, LmsError::Authorization(_)));
    }
    let err = certificates
        .revoke_certificate(&teacher, certificate.id, "")
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::Validation(_)));

    let revoked = certificates
        .revoke_certificate(&teacher, certificate.id, "fraud")
        .await
        .unwrap();
    assert!(revoked.revoked);
    assert_eq!(revoked.revoked_by, Some(TEACHER));
    assert_eq!(revoked.revoked_at, Some(h.now()));

    let verified = certificates.verify_certificate(&certificate.code).await.unwrap();
    assert!(!verified.is_valid);
    assert_eq!(verified.status, CertificateStatus::Revoked);
    assert_eq!(verified.revoke_reason.as_deref(), Some("fraud"));

    let err = certificates
        .revoke_certificate(&Principal::admin(ADMIN), certificate.id, "again")
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::InvalidTransition(_)));

    // 吊销不改变选课状态
    assert_eq!(
        h.enrollment(enrollment.id).await.status,
        EnrollmentStatus::Completed
    );
}
