//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod catalog;
mod certificates;
mod enrollments;
mod progress;
mod quiz_attempts;
mod submissions;

use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Self::from_connection(db).await
    }

    /// 使用已有连接构建存储并运行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| LmsError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成");

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LmsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(LmsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 写入错误映射：唯一约束冲突视为并发冲突
pub(crate) fn write_error(err: DbErr, context: &str) -> LmsError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            LmsError::concurrency_conflict(format!("{context}: {detail}"))
        }
        _ => LmsError::database_operation(format!("{context}失败: {err}")),
    }
}

// Storage trait 实现
use crate::models::{
    assignments::{
        entities::{Assignment, Submission},
        requests::NewSubmission,
    },
    certificates::entities::{Certificate, NewCertificate},
    courses::entities::{CourseOutline, CourseVersion, Lesson},
    enrollments::{entities::Enrollment, requests::NewEnrollment},
    payments::entities::PaymentTransaction,
    progress::entities::Progress,
    quizzes::{
        entities::{Quiz, QuizAttempt, QuizAttemptAnswer},
        requests::NewQuizAttempt,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 课程目录
    async fn get_course_version(&self, id: i64) -> Result<Option<CourseVersion>> {
        self.get_course_version_impl(id).await
    }

    async fn list_course_versions_by_course(&self, course_id: i64) -> Result<Vec<CourseVersion>> {
        self.list_course_versions_by_course_impl(course_id).await
    }

    async fn get_course_outline(&self, course_version_id: i64) -> Result<CourseOutline> {
        self.get_course_outline_impl(course_version_id).await
    }

    async fn get_lesson(&self, lesson_id: i64) -> Result<Option<Lesson>> {
        self.get_lesson_impl(lesson_id).await
    }

    async fn get_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>> {
        self.get_quiz_impl(quiz_id).await
    }

    async fn list_quizzes_by_course_version(&self, course_version_id: i64) -> Result<Vec<Quiz>> {
        self.list_quizzes_by_course_version_impl(course_version_id)
            .await
    }

    async fn get_assignment(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_impl(assignment_id).await
    }

    async fn list_assignments_by_course_version(
        &self,
        course_version_id: i64,
    ) -> Result<Vec<Assignment>> {
        self.list_assignments_by_course_version_impl(course_version_id)
            .await
    }

    async fn get_payment_transaction(&self, id: i64) -> Result<Option<PaymentTransaction>> {
        self.get_payment_transaction_impl(id).await
    }

    // 选课模块
    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment> {
        self.create_enrollment_impl(enrollment).await
    }

    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_id_impl(id).await
    }

    async fn find_enrolled_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        self.find_enrolled_enrollment_impl(student_id, course_id)
            .await
    }

    async fn find_latest_enrollment_for_version(
        &self,
        student_id: i64,
        course_version_id: i64,
    ) -> Result<Option<Enrollment>> {
        self.find_latest_enrollment_for_version_impl(student_id, course_version_id)
            .await
    }

    async fn list_enrollments_by_student(&self, student_id: i64) -> Result<Vec<Enrollment>> {
        self.list_enrollments_by_student_impl(student_id).await
    }

    async fn list_enrollments_by_course(&self, course_id: i64) -> Result<Vec<Enrollment>> {
        self.list_enrollments_by_course_impl(course_id).await
    }

    async fn list_overdue_enrollments(&self, now: DateTime<Utc>) -> Result<Vec<Enrollment>> {
        self.list_overdue_enrollments_impl(now).await
    }

    async fn update_enrollment(&self, enrollment: &Enrollment) -> Result<Enrollment> {
        self.update_enrollment_impl(enrollment).await
    }

    // 学习进度模块
    async fn get_progress(&self, enrollment_id: i64, lesson_id: i64) -> Result<Option<Progress>> {
        self.get_progress_impl(enrollment_id, lesson_id).await
    }

    async fn create_progress(&self, progress: &Progress) -> Result<Progress> {
        self.create_progress_impl(progress).await
    }

    async fn update_progress(&self, progress: &Progress) -> Result<Progress> {
        self.update_progress_impl(progress).await
    }

    async fn list_progress_by_enrollment(&self, enrollment_id: i64) -> Result<Vec<Progress>> {
        self.list_progress_by_enrollment_impl(enrollment_id).await
    }

    // 测验作答模块
    async fn create_quiz_attempt(&self, attempt: NewQuizAttempt) -> Result<QuizAttempt> {
        self.create_quiz_attempt_impl(attempt).await
    }

    async fn get_quiz_attempt(&self, id: i64) -> Result<Option<QuizAttempt>> {
        self.get_quiz_attempt_impl(id).await
    }

    async fn list_quiz_attempts(
        &self,
        quiz_id: i64,
        student_id: i64,
    ) -> Result<Vec<QuizAttempt>> {
        self.list_quiz_attempts_impl(quiz_id, student_id).await
    }

    async fn list_quiz_attempts_by_enrollment(
        &self,
        enrollment_id: i64,
    ) -> Result<Vec<QuizAttempt>> {
        self.list_quiz_attempts_by_enrollment_impl(enrollment_id)
            .await
    }

    async fn list_in_progress_attempts(&self) -> Result<Vec<QuizAttempt>> {
        self.list_in_progress_attempts_impl().await
    }

    async fn update_quiz_attempt(&self, attempt: &QuizAttempt) -> Result<QuizAttempt> {
        self.update_quiz_attempt_impl(attempt).await
    }

    async fn upsert_attempt_answer(
        &self,
        answer: &QuizAttemptAnswer,
    ) -> Result<QuizAttemptAnswer> {
        self.upsert_attempt_answer_impl(answer).await
    }

    async fn list_attempt_answers(&self, attempt_id: i64) -> Result<Vec<QuizAttemptAnswer>> {
        self.list_attempt_answers_impl(attempt_id).await
    }

    // 作业提交模块
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn get_submission(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_impl(id).await
    }

    async fn list_submissions(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Vec<Submission>> {
        self.list_submissions_impl(assignment_id, student_id).await
    }

    async fn list_submissions_by_enrollment(&self, enrollment_id: i64) -> Result<Vec<Submission>> {
        self.list_submissions_by_enrollment_impl(enrollment_id)
            .await
    }

    async fn list_submissions_by_assignment(&self, assignment_id: i64) -> Result<Vec<Submission>> {
        self.list_submissions_by_assignment_impl(assignment_id)
            .await
    }

    async fn update_submission(&self, submission: &Submission) -> Result<Submission> {
        self.update_submission_impl(submission).await
    }

    // 证书模块
    async fn create_certificate(&self, certificate: NewCertificate) -> Result<Certificate> {
        self.create_certificate_impl(certificate).await
    }

    async fn get_certificate_by_enrollment(
        &self,
        enrollment_id: i64,
    ) -> Result<Option<Certificate>> {
        self.get_certificate_by_enrollment_impl(enrollment_id)
            .await
    }

    async fn get_certificate(&self, id: i64) -> Result<Option<Certificate>> {
        self.get_certificate_impl(id).await
    }

    async fn get_certificate_by_code(&self, code: &str) -> Result<Option<Certificate>> {
        self.get_certificate_by_code_impl(code).await
    }

    async fn update_certificate(&self, certificate: &Certificate) -> Result<Certificate> {
        self.update_certificate_impl(certificate).await
    }
}
