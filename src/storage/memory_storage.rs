//! 内存存储实现
//!
//! 单把互斥锁保护全部表，语义与 SeaORM 实现一致
//! （乐观锁版本号、唯一约束、排序），用于测试与嵌入式场景。

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::Storage;
use crate::errors::{LmsError, Result};
use crate::models::{
    assignments::{
        entities::{Assignment, Submission, SubmissionStatus},
        requests::NewSubmission,
    },
    certificates::entities::{Certificate, NewCertificate},
    courses::entities::{Chapter, CourseOutline, CourseVersion, Lesson},
    enrollments::{
        entities::{Enrollment, EnrollmentStatus},
        requests::NewEnrollment,
    },
    payments::entities::PaymentTransaction,
    progress::entities::Progress,
    quizzes::{
        entities::{Quiz, QuizAttempt, QuizAttemptAnswer, QuizAttemptStatus},
        requests::NewQuizAttempt,
    },
};

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    course_versions: BTreeMap<i64, CourseVersion>,
    chapters: BTreeMap<i64, Chapter>,
    quizzes: BTreeMap<i64, Quiz>,
    assignments: BTreeMap<i64, Assignment>,
    payments: BTreeMap<i64, PaymentTransaction>,
    enrollments: BTreeMap<i64, Enrollment>,
    progress: BTreeMap<i64, Progress>,
    attempts: BTreeMap<i64, QuizAttempt>,
    answers: BTreeMap<i64, QuizAttemptAnswer>,
    submissions: BTreeMap<i64, Submission>,
    certificates: BTreeMap<i64, Certificate>,
    injected_conflicts: u32,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    // ==================== 课程目录写入（由内容模块负责，这里供装配使用） ====================

    pub fn add_course_version(&self, course_version: CourseVersion) {
        self.state()
            .course_versions
            .insert(course_version.id, course_version);
    }

    /// 添加章节（课时随章节一起保存）
    pub fn add_chapter(&self, mut chapter: Chapter) {
        chapter.lessons.sort_by_key(|l| (l.order_index, l.id));
        self.state().chapters.insert(chapter.id, chapter);
    }

    pub fn add_quiz(&self, mut quiz: Quiz) {
        quiz.questions.sort_by_key(|q| (q.order_index, q.id));
        for question in &mut quiz.questions {
            question.options.sort_by_key(|o| (o.order_index, o.id));
        }
        self.state().quizzes.insert(quiz.id, quiz);
    }

    pub fn remove_quiz(&self, quiz_id: i64) {
        self.state().quizzes.remove(&quiz_id);
    }

    pub fn add_assignment(&self, assignment: Assignment) {
        self.state().assignments.insert(assignment.id, assignment);
    }

    pub fn add_payment(&self, payment: PaymentTransaction) {
        self.state().payments.insert(payment.id, payment);
    }

    /// 让接下来 `count` 次选课更新返回 ConcurrencyConflict，模拟其他进程并发写入
    pub fn inject_enrollment_conflicts(&self, count: u32) {
        self.state().injected_conflicts = count;
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    // 课程目录
    async fn get_course_version(&self, id: i64) -> Result<Option<CourseVersion>> {
        Ok(self.state().course_versions.get(&id).cloned())
    }

    async fn list_course_versions_by_course(&self, course_id: i64) -> Result<Vec<CourseVersion>> {
        let mut versions: Vec<CourseVersion> = self
            .state()
            .course_versions
            .values()
            .filter(|v| v.course_id == course_id)
            .cloned()
            .collect();
        versions.sort_by_key(|v| v.version_number);
        Ok(versions)
    }

    async fn get_course_outline(&self, course_version_id: i64) -> Result<CourseOutline> {
        let state = self.state();
        let mut chapters: Vec<Chapter> = state
            .chapters
            .values()
            .filter(|c| c.course_version_id == course_version_id)
            .cloned()
            .collect();
        chapters.sort_by_key(|c| (c.order_index, c.id));
        Ok(CourseOutline {
            course_version_id,
            chapters,
        })
    }

    async fn get_lesson(&self, lesson_id: i64) -> Result<Option<Lesson>> {
        Ok(self
            .state()
            .chapters
            .values()
            .flat_map(|c| c.lessons.iter())
            .find(|l| l.id == lesson_id)
            .cloned())
    }

    async fn get_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>> {
        Ok(self.state().quizzes.get(&quiz_id).cloned())
    }

    async fn list_quizzes_by_course_version(&self, course_version_id: i64) -> Result<Vec<Quiz>> {
        Ok(self
            .state()
            .quizzes
            .values()
            .filter(|q| q.course_version_id == course_version_id)
            .cloned()
            .collect())
    }

    async fn get_assignment(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        Ok(self.state().assignments.get(&assignment_id).cloned())
    }

    async fn list_assignments_by_course_version(
        &self,
        course_version_id: i64,
    ) -> Result<Vec<Assignment>> {
        Ok(self
            .state()
            .assignments
            .values()
            .filter(|a| a.course_version_id == course_version_id)
            .cloned()
            .collect())
    }

    async fn get_payment_transaction(&self, id: i64) -> Result<Option<PaymentTransaction>> {
        Ok(self.state().payments.get(&id).cloned())
    }

    // 选课
    async fn create_enrollment(&self, req: NewEnrollment) -> Result<Enrollment> {
        let mut state = self.state();
        let duplicate = state.enrollments.values().any(|e| {
            e.student_id == req.student_id
                && e.course_id == req.course_id
                && e.status == EnrollmentStatus::Enrolled
        });
        if duplicate {
            return Err(LmsError::already_enrolled(format!(
                "student {} already has an active enrollment in course {}",
                req.student_id, req.course_id
            )));
        }

        let id = state.next_id();
        let enrollment = Enrollment {
            id,
            student_id: req.student_id,
            course_id: req.course_id,
            course_version_id: req.course_version_id,
            status: EnrollmentStatus::Enrolled,
            enrolled_at: req.enrolled_at,
            start_at: req.enrolled_at,
            end_at: req.end_at,
            completion_percentage: 0.0,
            average_score: None,
            final_exam_score: None,
            final_exam_weight: req.policy.final_weight,
            pass_score: req.policy.pass_score,
            min_progress_pct: req.policy.min_progress_pct,
            certificate_issued: false,
            certificate_id: None,
            completed_at: None,
            cancellation_reason: None,
            cancelled_at: None,
            ban_reason: None,
            banned_at: None,
            payment_transaction_id: req.payment_transaction_id,
            version: 1,
            created_at: req.enrolled_at,
            updated_at: req.enrolled_at,
        };
        state.enrollments.insert(id, enrollment.clone());
        Ok(enrollment)
    }

    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        Ok(self.state().enrollments.get(&id).cloned())
    }

    async fn find_enrolled_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        Ok(self
            .state()
            .enrollments
            .values()
            .find(|e| {
                e.student_id == student_id
                    && e.course_id == course_id
                    && e.status == EnrollmentStatus::Enrolled
            })
            .cloned())
    }

    async fn find_latest_enrollment_for_version(
        &self,
        student_id: i64,
        course_version_id: i64,
    ) -> Result<Option<Enrollment>> {
        Ok(self
            .state()
            .enrollments
            .values()
            .rev()
            .find(|e| e.student_id == student_id && e.course_version_id == course_version_id)
            .cloned())
    }

    async fn list_enrollments_by_student(&self, student_id: i64) -> Result<Vec<Enrollment>> {
        Ok(self
            .state()
            .enrollments
            .values()
            .filter(|e| e.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn list_enrollments_by_course(&self, course_id: i64) -> Result<Vec<Enrollment>> {
        Ok(self
            .state()
            .enrollments
            .values()
            .filter(|e| e.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn list_overdue_enrollments(&self, now: DateTime<Utc>) -> Result<Vec<Enrollment>> {
        Ok(self
            .state()
            .enrollments
            .values()
            .filter(|e| e.is_due_for_expiry(now))
            .cloned()
            .collect())
    }

    async fn update_enrollment(&self, enrollment: &Enrollment) -> Result<Enrollment> {
        let mut state = self.state();
        if state.injected_conflicts > 0 {
            state.injected_conflicts -= 1;
            return Err(LmsError::concurrency_conflict(format!(
                "enrollment {} was modified concurrently",
                enrollment.id
            )));
        }
        let stored = state
            .enrollments
            .get_mut(&enrollment.id)
            .ok_or_else(|| LmsError::not_found(format!("enrollment {}", enrollment.id)))?;
        if stored.version != enrollment.version {
            return Err(LmsError::concurrency_conflict(format!(
                "enrollment {} version {} is stale (current {})",
                enrollment.id, enrollment.version, stored.version
            )));
        }
        let mut updated = enrollment.clone();
        updated.version += 1;
        *stored = updated.clone();
        Ok(updated)
    }

    // 学习进度
    async fn get_progress(&self, enrollment_id: i64, lesson_id: i64) -> Result<Option<Progress>> {
        Ok(self
            .state()
            .progress
            .values()
            .find(|p| p.enrollment_id == enrollment_id && p.lesson_id == lesson_id)
            .cloned())
    }

    async fn create_progress(&self, progress: &Progress) -> Result<Progress> {
        let mut state = self.state();
        let exists = state
            .progress
            .values()
            .any(|p| p.enrollment_id == progress.enrollment_id && p.lesson_id == progress.lesson_id);
        if exists {
            return Err(LmsError::concurrency_conflict(format!(
                "progress for enrollment {} lesson {} already exists",
                progress.enrollment_id, progress.lesson_id
            )));
        }
        let mut created = progress.clone();
        created.id = state.next_id();
        state.progress.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_progress(&self, progress: &Progress) -> Result<Progress> {
        let mut state = self.state();
        let stored = state
            .progress
            .get_mut(&progress.id)
            .ok_or_else(|| LmsError::not_found(format!("progress {}", progress.id)))?;
        *stored = progress.clone();
        Ok(progress.clone())
    }

    async fn list_progress_by_enrollment(&self, enrollment_id: i64) -> Result<Vec<Progress>> {
        Ok(self
            .state()
            .progress
            .values()
            .filter(|p| p.enrollment_id == enrollment_id)
            .cloned()
            .collect())
    }

    // 测验作答
    async fn create_quiz_attempt(&self, req: NewQuizAttempt) -> Result<QuizAttempt> {
        let mut state = self.state();
        let duplicate = state.attempts.values().any(|a| {
            a.quiz_id == req.quiz_id
                && a.student_id == req.student_id
                && a.attempt_number == req.attempt_number
        });
        if duplicate {
            return Err(LmsError::concurrency_conflict(format!(
                "attempt {} of quiz {} for student {} already exists",
                req.attempt_number, req.quiz_id, req.student_id
            )));
        }
        let attempt = QuizAttempt {
            id: state.next_id(),
            quiz_id: req.quiz_id,
            student_id: req.student_id,
            enrollment_id: req.enrollment_id,
            attempt_number: req.attempt_number,
            status: QuizAttemptStatus::InProgress,
            started_at: req.started_at,
            finished_at: None,
            total_score: None,
            shuffle_seed: req.shuffle_seed,
            updated_at: req.started_at,
        };
        state.attempts.insert(attempt.id, attempt.clone());
        Ok(attempt)
    }

    async fn get_quiz_attempt(&self, id: i64) -> Result<Option<QuizAttempt>> {
        Ok(self.state().attempts.get(&id).cloned())
    }

    async fn list_quiz_attempts(
        &self,
        quiz_id: i64,
        student_id: i64,
    ) -> Result<Vec<QuizAttempt>> {
        let mut attempts: Vec<QuizAttempt> = self
            .state()
            .attempts
            .values()
            .filter(|a| a.quiz_id == quiz_id && a.student_id == student_id)
            .cloned()
            .collect();
        attempts.sort_by_key(|a| a.attempt_number);
        Ok(attempts)
    }

    async fn list_quiz_attempts_by_enrollment(
        &self,
        enrollment_id: i64,
    ) -> Result<Vec<QuizAttempt>> {
        Ok(self
            .state()
            .attempts
            .values()
            .filter(|a| a.enrollment_id == enrollment_id)
            .cloned()
            .collect())
    }

    async fn list_in_progress_attempts(&self) -> Result<Vec<QuizAttempt>> {
        Ok(self
            .state()
            .attempts
            .values()
            .filter(|a| a.status == QuizAttemptStatus::InProgress)
            .cloned()
            .collect())
    }

    async fn update_quiz_attempt(&self, attempt: &QuizAttempt) -> Result<QuizAttempt> {
        let mut state = self.state();
        let stored = state
            .attempts
            .get_mut(&attempt.id)
            .ok_or_else(|| LmsError::not_found(format!("quiz attempt {}", attempt.id)))?;
        *stored = attempt.clone();
        Ok(attempt.clone())
    }

    async fn upsert_attempt_answer(
        &self,
        answer: &QuizAttemptAnswer,
    ) -> Result<QuizAttemptAnswer> {
        let mut state = self.state();
        let existing_id = state
            .answers
            .values()
            .find(|a| a.attempt_id == answer.attempt_id && a.question_id == answer.question_id)
            .map(|a| a.id);
        let mut saved = answer.clone();
        saved.id = match existing_id {
            Some(id) => id,
            None => state.next_id(),
        };
        state.answers.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn list_attempt_answers(&self, attempt_id: i64) -> Result<Vec<QuizAttemptAnswer>> {
        Ok(self
            .state()
            .answers
            .values()
            .filter(|a| a.attempt_id == attempt_id)
            .cloned()
            .collect())
    }

    // 作业提交
    async fn create_submission(&self, req: NewSubmission) -> Result<Submission> {
        let mut state = self.state();
        let duplicate = state.submissions.values().any(|s| {
            s.assignment_id == req.assignment_id
                && s.student_id == req.student_id
                && s.attempt_number == req.attempt_number
        });
        if duplicate {
            return Err(LmsError::concurrency_conflict(format!(
                "submission attempt {} for assignment {} already exists",
                req.attempt_number, req.assignment_id
            )));
        }
        let submission = Submission {
            id: state.next_id(),
            assignment_id: req.assignment_id,
            student_id: req.student_id,
            enrollment_id: req.enrollment_id,
            attempt_number: req.attempt_number,
            previous_submission_id: req.previous_submission_id,
            content: req.content,
            status: SubmissionStatus::Pending,
            score: None,
            feedback: None,
            graded_by: None,
            graded_at: None,
            submitted_at: req.submitted_at,
            updated_at: req.submitted_at,
        };
        state.submissions.insert(submission.id, submission.clone());
        Ok(submission)
    }

    async fn get_submission(&self, id: i64) -> Result<Option<Submission>> {
        Ok(self.state().submissions.get(&id).cloned())
    }

    async fn list_submissions(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Vec<Submission>> {
        let mut submissions: Vec<Submission> = self
            .state()
            .submissions
            .values()
            .filter(|s| s.assignment_id == assignment_id && s.student_id == student_id)
            .cloned()
            .collect();
        submissions.sort_by_key(|s| s.attempt_number);
        Ok(submissions)
    }

    async fn list_submissions_by_enrollment(&self, enrollment_id: i64) -> Result<Vec<Submission>> {
        Ok(self
            .state()
            .submissions
            .values()
            .filter(|s| s.enrollment_id == enrollment_id)
            .cloned()
            .collect())
    }

    async fn list_submissions_by_assignment(&self, assignment_id: i64) -> Result<Vec<Submission>> {
        Ok(self
            .state()
            .submissions
            .values()
            .filter(|s| s.assignment_id == assignment_id)
            .cloned()
            .collect())
    }

    async fn update_submission(&self, submission: &Submission) -> Result<Submission> {
        let mut state = self.state();
        let stored = state
            .submissions
            .get_mut(&submission.id)
            .ok_or_else(|| LmsError::not_found(format!("submission {}", submission.id)))?;
        *stored = submission.clone();
        Ok(submission.clone())
    }

    // 证书
    async fn create_certificate(&self, req: NewCertificate) -> Result<Certificate> {
        let mut state = self.state();
        if state
            .certificates
            .values()
            .any(|c| c.enrollment_id == req.enrollment_id)
        {
            return Err(LmsError::concurrency_conflict(format!(
                "certificate for enrollment {} already exists",
                req.enrollment_id
            )));
        }
        let certificate = Certificate {
            id: state.next_id(),
            enrollment_id: req.enrollment_id,
            student_id: req.student_id,
            course_version_id: req.course_version_id,
            code: req.code,
            final_score: req.final_score,
            issued_at: req.issued_at,
            revoked: false,
            revoked_at: None,
            revoked_by: None,
            revoke_reason: None,
        };
        state
            .certificates
            .insert(certificate.id, certificate.clone());
        Ok(certificate)
    }

    async fn get_certificate_by_enrollment(
        &self,
        enrollment_id: i64,
    ) -> Result<Option<Certificate>> {
        Ok(self
            .state()
            .certificates
            .values()
            .find(|c| c.enrollment_id == enrollment_id)
            .cloned())
    }

    async fn get_certificate(&self, id: i64) -> Result<Option<Certificate>> {
        Ok(self.state().certificates.get(&id).cloned())
    }

    async fn get_certificate_by_code(&self, code: &str) -> Result<Option<Certificate>> {
        Ok(self
            .state()
            .certificates
            .values()
            .find(|c| c.code == code)
            .cloned())
    }

    async fn update_certificate(&self, certificate: &Certificate) -> Result<Certificate> {
        let mut state = self.state();
        let stored = state
            .certificates
            .get_mut(&certificate.id)
            .ok_or_else(|| LmsError::not_found(format!("certificate {}", certificate.id)))?;
        *stored = certificate.clone();
        Ok(certificate.clone())
    }
}
