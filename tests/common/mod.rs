//! 集成测试公共装配：内存存储 + 手动时钟

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};

use rust_lms_next::LearningEngine;
use rust_lms_next::config::LearningConfig;
use rust_lms_next::models::Principal;
use rust_lms_next::models::assignments::entities::Assignment;
use rust_lms_next::models::courses::entities::{
    Chapter, CourseVersion, CourseVersionStatus, Lesson, LessonType,
};
use rust_lms_next::models::enrollments::entities::Enrollment;
use rust_lms_next::models::quizzes::entities::{AnswerOption, QuestionType, Quiz, QuizQuestion};
use rust_lms_next::services::EngineContext;
use rust_lms_next::storage::MemoryStorage;
use rust_lms_next::utils::{Clock, fixed_clock};

pub const STUDENT: i64 = 1001;
pub const OTHER_STUDENT: i64 = 1002;
pub const TEACHER: i64 = 2001;
pub const OTHER_TEACHER: i64 = 2002;
pub const ADMIN: i64 = 3001;

pub struct Harness {
    pub storage: Arc<MemoryStorage>,
    pub clock: Clock,
    pub engine: LearningEngine,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_policy(LearningConfig::default())
    }

    pub fn with_policy(policy: LearningConfig) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let clock = fixed_clock();
        let context = EngineContext::builder(storage.clone())
            .clock(clock.clone())
            .policy(policy)
            .build();
        Self {
            storage,
            clock,
            engine: LearningEngine::new(context),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub async fn enroll(&self, student_id: i64, course_version_id: i64) -> Enrollment {
        self.engine
            .enrollments
            .enroll(
                &Principal::student(student_id),
                student_id,
                course_version_id,
                None,
            )
            .await
            .expect("enrollment should succeed")
    }

    pub async fn enrollment(&self, enrollment_id: i64) -> Enrollment {
        self.engine
            .enrollments
            .get_enrollment(&Principal::admin(ADMIN), enrollment_id)
            .await
            .expect("enrollment should exist")
    }
}

pub struct CourseSpec {
    pub price: f64,
    pub duration_days: i32,
    pub pass_score: f64,
    pub final_weight: f64,
    pub min_progress_pct: f64,
}

impl Default for CourseSpec {
    fn default() -> Self {
        Self {
            price: 0.0,
            duration_days: 0,
            pass_score: 5.0,
            final_weight: 0.0,
            min_progress_pct: 0.0,
        }
    }
}

/// 发布一个课程版本，`lessons` 个课时平均分在一个章节里
pub fn seed_course(
    storage: &MemoryStorage,
    course_version_id: i64,
    spec: CourseSpec,
    lessons: usize,
    lesson_seconds: i64,
) {
    let ts = DateTime::<Utc>::from_timestamp(1_600_000_000, 0).unwrap();
    storage.add_course_version(CourseVersion {
        id: course_version_id,
        course_id: course_version_id * 10,
        teacher_id: TEACHER,
        version_number: 1,
        title: format!("course {course_version_id}"),
        price: spec.price,
        duration_days: spec.duration_days,
        pass_score: spec.pass_score,
        final_weight: spec.final_weight,
        min_progress_pct: spec.min_progress_pct,
        status: CourseVersionStatus::Published,
        created_at: ts,
        updated_at: ts,
    });

    let chapter_id = course_version_id * 100;
    storage.add_chapter(Chapter {
        id: chapter_id,
        course_version_id,
        title: "chapter".into(),
        order_index: 0,
        lessons: (0..lessons)
            .map(|i| Lesson {
                id: lesson_id(course_version_id, i),
                chapter_id,
                course_version_id,
                title: format!("lesson {i}"),
                lesson_type: LessonType::Video,
                duration_seconds: lesson_seconds,
                order_index: i as i32,
            })
            .collect(),
    });
}

pub fn lesson_id(course_version_id: i64, index: usize) -> i64 {
    course_version_id * 1000 + index as i64
}

/// `questions` 道 1 分单选题，每题选项 `option_id(q, 1)` 正确、`option_id(q, 2)` 错误
pub fn choice_quiz(quiz_id: i64, course_version_id: i64, questions: usize) -> Quiz {
    Quiz {
        id: quiz_id,
        course_version_id,
        lesson_id: None,
        title: format!("quiz {quiz_id}"),
        max_attempts: None,
        time_limit_minutes: None,
        passing_score: None,
        randomize_questions: false,
        randomize_options: false,
        total_points: questions as f64,
        is_final_exam: false,
        questions: (0..questions)
            .map(|i| {
                let id = question_id(quiz_id, i);
                QuizQuestion {
                    id,
                    quiz_id,
                    question_type: QuestionType::SingleChoice,
                    content: format!("question {i}"),
                    points: 1.0,
                    order_index: i as i32,
                    options: vec![
                        AnswerOption {
                            id: option_id(id, 1),
                            question_id: id,
                            content: "right".into(),
                            is_correct: true,
                            order_index: 0,
                        },
                        AnswerOption {
                            id: option_id(id, 2),
                            question_id: id,
                            content: "wrong".into(),
                            is_correct: false,
                            order_index: 1,
                        },
                    ],
                }
            })
            .collect(),
    }
}

pub fn question_id(quiz_id: i64, index: usize) -> i64 {
    quiz_id * 100 + index as i64
}

pub fn option_id(question_id: i64, choice: i64) -> i64 {
    question_id * 10 + choice
}

pub fn assignment(assignment_id: i64, course_version_id: i64, total_points: f64) -> Assignment {
    Assignment {
        id: assignment_id,
        course_version_id,
        lesson_id: None,
        title: format!("assignment {assignment_id}"),
        total_points,
        time_limit_minutes: None,
        max_attempts: None,
        due_at: None,
    }
}

/// 开始一次作答，答对 `correct` 题后交卷
pub async fn take_quiz(
    harness: &Harness,
    student_id: i64,
    quiz: &Quiz,
    correct: usize,
) -> rust_lms_next::models::quizzes::entities::QuizAttempt {
    use rust_lms_next::models::quizzes::requests::SubmitAnswerRequest;

    let principal = Principal::student(student_id);
    let quizzes = &harness.engine.quizzes;
    let attempt = quizzes
        .start(&principal, quiz.id, student_id)
        .await
        .expect("attempt should start");
    for (i, question) in quiz.questions.iter().enumerate() {
        let choice = if i < correct { 1 } else { 2 };
        quizzes
            .submit_answer(
                &principal,
                attempt.id,
                question.id,
                SubmitAnswerRequest::options([option_id(question.id, choice)]),
            )
            .await
            .expect("answer should be accepted");
    }
    quizzes
        .finish(&principal, attempt.id)
        .await
        .expect("attempt should finish")
}
