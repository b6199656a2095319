//! 预导入模块，方便使用

pub use super::answer_options::{
    ActiveModel as AnswerOptionActiveModel, Entity as AnswerOptions, Model as AnswerOptionModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::certificates::{
    ActiveModel as CertificateActiveModel, Entity as Certificates, Model as CertificateModel,
};
pub use super::chapters::{
    ActiveModel as ChapterActiveModel, Entity as Chapters, Model as ChapterModel,
};
pub use super::course_versions::{
    ActiveModel as CourseVersionActiveModel, Entity as CourseVersions, Model as CourseVersionModel,
};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::lessons::{ActiveModel as LessonActiveModel, Entity as Lessons, Model as LessonModel};
pub use super::payment_transactions::{
    ActiveModel as PaymentTransactionActiveModel, Entity as PaymentTransactions,
    Model as PaymentTransactionModel,
};
pub use super::progress::{
    ActiveModel as ProgressActiveModel, Entity as ProgressRecords, Model as ProgressModel,
};
pub use super::quiz_attempt_answers::{
    ActiveModel as QuizAttemptAnswerActiveModel, Entity as QuizAttemptAnswers,
    Model as QuizAttemptAnswerModel,
};
pub use super::quiz_attempts::{
    ActiveModel as QuizAttemptActiveModel, Entity as QuizAttempts, Model as QuizAttemptModel,
};
pub use super::quiz_questions::{
    ActiveModel as QuizQuestionActiveModel, Entity as QuizQuestions, Model as QuizQuestionModel,
};
pub use super::quizzes::{ActiveModel as QuizActiveModel, Entity as Quizzes, Model as QuizModel};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
