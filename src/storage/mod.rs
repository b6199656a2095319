use std::sync::Arc;

use chrono::{DateTime, Utc};

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

use crate::errors::Result;

pub mod memory_storage;
pub mod sea_orm_storage;

pub use memory_storage::MemoryStorage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 课程目录（只读）
    // 通过ID获取课程版本
    async fn get_course_version(&self, id: i64) -> Result<Option<CourseVersion>>;
    // 列出课程的全部版本（按版本号升序）
    async fn list_course_versions_by_course(&self, course_id: i64) -> Result<Vec<CourseVersion>>;
    // 获取课程版本大纲（章节 + 课时，按顺序）
    async fn get_course_outline(&self, course_version_id: i64) -> Result<CourseOutline>;
    // 通过ID获取课时
    async fn get_lesson(&self, lesson_id: i64) -> Result<Option<Lesson>>;
    // 通过ID获取测验（含题目与选项）
    async fn get_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>>;
    // 列出课程版本下的测验
    async fn list_quizzes_by_course_version(&self, course_version_id: i64) -> Result<Vec<Quiz>>;
    // 通过ID获取作业
    async fn get_assignment(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    // 列出课程版本下的作业
    async fn list_assignments_by_course_version(
        &self,
        course_version_id: i64,
    ) -> Result<Vec<Assignment>>;

    /// 支付流水（只读）
    async fn get_payment_transaction(&self, id: i64) -> Result<Option<PaymentTransaction>>;

    /// 选课管理方法
    // 创建选课，同一课程已有学习中的选课时返回 AlreadyEnrolled
    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment>;
    // 通过ID获取选课
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>>;
    // 获取学生在某课程下学习中的选课
    async fn find_enrolled_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>>;
    // 获取学生在某课程版本下最近的选课
    async fn find_latest_enrollment_for_version(
        &self,
        student_id: i64,
        course_version_id: i64,
    ) -> Result<Option<Enrollment>>;
    // 列出学生的全部选课
    async fn list_enrollments_by_student(&self, student_id: i64) -> Result<Vec<Enrollment>>;
    // 列出课程下的全部选课（不限版本与状态）
    async fn list_enrollments_by_course(&self, course_id: i64) -> Result<Vec<Enrollment>>;
    // 列出截止时间早于 now 且仍在学习中的选课
    async fn list_overdue_enrollments(&self, now: DateTime<Utc>) -> Result<Vec<Enrollment>>;
    // 按版本号更新选课，版本不一致返回 ConcurrencyConflict
    async fn update_enrollment(&self, enrollment: &Enrollment) -> Result<Enrollment>;

    /// 学习进度方法
    // 获取某选课下某课时的进度
    async fn get_progress(&self, enrollment_id: i64, lesson_id: i64) -> Result<Option<Progress>>;
    // 创建进度
    async fn create_progress(&self, progress: &Progress) -> Result<Progress>;
    // 更新进度
    async fn update_progress(&self, progress: &Progress) -> Result<Progress>;
    // 列出某选课下的全部进度
    async fn list_progress_by_enrollment(&self, enrollment_id: i64) -> Result<Vec<Progress>>;

    /// 测验作答方法
    // 创建作答，(quiz, student, attempt_number) 重复时返回 ConcurrencyConflict
    async fn create_quiz_attempt(&self, attempt: NewQuizAttempt) -> Result<QuizAttempt>;
    // 通过ID获取作答
    async fn get_quiz_attempt(&self, id: i64) -> Result<Option<QuizAttempt>>;
    // 列出学生某测验的全部作答（按 attempt_number 升序）
    async fn list_quiz_attempts(&self, quiz_id: i64, student_id: i64)
    -> Result<Vec<QuizAttempt>>;
    // 列出某选课下的全部作答
    async fn list_quiz_attempts_by_enrollment(&self, enrollment_id: i64)
    -> Result<Vec<QuizAttempt>>;
    // 列出所有作答中的记录
    async fn list_in_progress_attempts(&self) -> Result<Vec<QuizAttempt>>;
    // 更新作答
    async fn update_quiz_attempt(&self, attempt: &QuizAttempt) -> Result<QuizAttempt>;
    // 按 (attempt, question) 新增或覆盖答案
    async fn upsert_attempt_answer(&self, answer: &QuizAttemptAnswer)
    -> Result<QuizAttemptAnswer>;
    // 列出某次作答的全部答案
    async fn list_attempt_answers(&self, attempt_id: i64) -> Result<Vec<QuizAttemptAnswer>>;

    /// 作业提交方法
    // 创建提交
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission(&self, id: i64) -> Result<Option<Submission>>;
    // 列出学生某作业的全部提交（按 attempt_number 升序）
    async fn list_submissions(&self, assignment_id: i64, student_id: i64)
    -> Result<Vec<Submission>>;
    // 列出某选课下的全部提交
    async fn list_submissions_by_enrollment(&self, enrollment_id: i64) -> Result<Vec<Submission>>;
    // 列出某作业的全部提交
    async fn list_submissions_by_assignment(&self, assignment_id: i64) -> Result<Vec<Submission>>;
    // 更新提交
    async fn update_submission(&self, submission: &Submission) -> Result<Submission>;

    /// 证书方法
    // 创建证书
    async fn create_certificate(&self, certificate: NewCertificate) -> Result<Certificate>;
    // 获取选课对应的证书
    async fn get_certificate_by_enrollment(&self, enrollment_id: i64)
    -> Result<Option<Certificate>>;
    // 通过ID获取证书
    async fn get_certificate(&self, id: i64) -> Result<Option<Certificate>>;
    // 通过证书编号获取证书
    async fn get_certificate_by_code(&self, code: &str) -> Result<Option<Certificate>>;
    // 更新证书（吊销）
    async fn update_certificate(&self, certificate: &Certificate) -> Result<Certificate>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
