//! 内存 SQLite 上的 SeaORM 存储

use std::sync::Arc;

use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};

use rust_lms_next::entity::{chapters, course_versions, lessons};
use rust_lms_next::models::Principal;
use rust_lms_next::models::enrollments::entities::EnrollmentStatus;
use rust_lms_next::models::progress::entities::{Progress, ProgressStatus};
use rust_lms_next::storage::Storage;
use rust_lms_next::storage::sea_orm_storage::SeaOrmStorage;
use rust_lms_next::utils::fixed_clock;
use rust_lms_next::{EngineContext, LearningEngine, LmsError};

const STUDENT: i64 = 1001;
const TEACHER: i64 = 2001;

async fn sqlite_storage() -> Arc<SeaOrmStorage> {
    // 内存库只在单个连接内可见
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();

    let storage = SeaOrmStorage::from_connection(db.clone()).await.unwrap();

    let ts = 1_600_000_000;

    course_versions::ActiveModel {
        id: Set(1),
        course_id: Set(10),
        teacher_id: Set(TEACHER),
        version_number: Set(1),
        title: Set("course".into()),
        price: Set(0.0),
        duration_days: Set(0),
        pass_score: Set(5.0),
        final_weight: Set(0.0),
        min_progress_pct: Set(0.0),
        status: Set("published".into()),
        created_at: Set(ts),
        updated_at: Set(ts),
    }
    .insert(&db)
    .await
    .unwrap();
    chapters::ActiveModel {
        id: Set(100),
        course_version_id: Set(1),
        title: Set("chapter".into()),
        order_index: Set(0),
    }
    .insert(&db)
    .await
    .unwrap();
    for i in 0..2 {
        lessons::ActiveModel {
            id: Set(1000 + i),
            chapter_id: Set(100),
            course_version_id: Set(1),
            title: Set(format!("lesson {i}")),
            lesson_type: Set("video".into()),
            duration_seconds: Set(60),
            order_index: Set(i as i32),
        }
        .insert(&db)
        .await
        .unwrap();
    }

    Arc::new(storage)
}

fn engine(storage: Arc<SeaOrmStorage>) -> LearningEngine {
    let context = EngineContext::builder(storage).clock(fixed_clock()).build();
    LearningEngine::new(context)
}

#[tokio::test]
async fn test_engine_over_sqlite() {
    let storage = sqlite_storage().await;
    let engine = engine(storage.clone());
    let student = Principal::student(STUDENT);

    let enrollment = engine
        .enrollments
        .enroll(&student, STUDENT, 1, None)
        .await
        .unwrap();
    assert_eq!(enrollment.course_id, 10);
    assert_eq!(enrollment.version, 1);

    let err = engine
        .enrollments
        .enroll(&student, STUDENT, 1, None)
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::AlreadyEnrolled(_)));

    let progress = engine
        .progress
        .mark_complete(&student, enrollment.id, 1000)
        .await
        .unwrap();
    assert!(progress.is_persisted());
    assert_eq!(progress.status, ProgressStatus::Completed);

    let stored = storage.get_enrollment_by_id(enrollment.id).await.unwrap().unwrap();
    assert_eq!(stored.completion_percentage, 50.0);
    assert_eq!(stored.status, EnrollmentStatus::Enrolled);
    assert!(stored.version > enrollment.version);

    let stats = engine
        .enrollments
        .enrollment_stats(&Principal::teacher(TEACHER), 10)
        .await
        .unwrap();
    assert_eq!(stats.total_enrollments, 1);
    assert_eq!(stats.average_completion_percentage, 50.0);
}

#[tokio::test]
async fn test_stale_enrollment_version_conflicts() {
    let storage = sqlite_storage().await;
    let engine = engine(storage.clone());
    let enrollment = engine
        .enrollments
        .enroll(&Principal::student(STUDENT), STUDENT, 1, None)
        .await
        .unwrap();

    let mut first = enrollment.clone();
    first.completion_percentage = 10.0;
    let saved = storage.update_enrollment(&first).await.unwrap();
    assert_eq!(saved.version, enrollment.version + 1);

    let mut stale = enrollment.clone();
    stale.completion_percentage = 20.0;
    let err = storage.update_enrollment(&stale).await.unwrap_err();
    assert!(matches!(err, LmsError::ConcurrencyConflict(_)));

    let current = storage.get_enrollment_by_id(enrollment.id).await.unwrap().unwrap();
    assert_eq!(current.completion_percentage, 10.0);
    assert_eq!(current.version, saved.version);

    let mut missing = enrollment.clone();
    missing.id = 999;
    let err = storage.update_enrollment(&missing).await.unwrap_err();
    assert!(matches!(err, LmsError::NotFound(_)));
}

#[tokio::test]
async fn test_duplicate_progress_row_conflicts() {
    let storage = sqlite_storage().await;
    let engine = engine(storage.clone());
    let enrollment = engine
        .enrollments
        .enroll(&Principal::student(STUDENT), STUDENT, 1, None)
        .await
        .unwrap();

    let now = fixed_clock().now();
    let created = storage
        .create_progress(&Progress::new(enrollment.id, STUDENT, 1001, now))
        .await
        .unwrap();
    assert!(created.is_persisted());
    assert_eq!(created.status, ProgressStatus::NotStarted);

    let err = storage
        .create_progress(&Progress::new(enrollment.id, STUDENT, 1001, now))
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::ConcurrencyConflict(_)));
}
