use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建课程版本表
        manager
            .create_table(
                Table::create()
                    .table(CourseVersions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseVersions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseVersions::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(CourseVersions::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(CourseVersions::VersionNumber).integer().not_null())
                    .col(ColumnDef::new(CourseVersions::Title).string().not_null())
                    .col(
                        ColumnDef::new(CourseVersions::Price)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(CourseVersions::DurationDays)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CourseVersions::PassScore).double().not_null())
                    .col(ColumnDef::new(CourseVersions::FinalWeight).double().not_null())
                    .col(ColumnDef::new(CourseVersions::MinProgressPct).double().not_null())
                    .col(ColumnDef::new(CourseVersions::Status).string().not_null())
                    .col(ColumnDef::new(CourseVersions::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(CourseVersions::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建章节表
        manager
            .create_table(
                Table::create()
                    .table(Chapters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Chapters::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Chapters::CourseVersionId).big_integer().not_null())
                    .col(ColumnDef::new(Chapters::Title).string().not_null())
                    .col(ColumnDef::new(Chapters::OrderIndex).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Chapters::Table, Chapters::CourseVersionId)
                            .to(CourseVersions::Table, CourseVersions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建课时表
        manager
            .create_table(
                Table::create()
                    .table(Lessons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Lessons::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Lessons::ChapterId).big_integer().not_null())
                    .col(ColumnDef::new(Lessons::CourseVersionId).big_integer().not_null())
                    .col(ColumnDef::new(Lessons::Title).string().not_null())
                    .col(ColumnDef::new(Lessons::LessonType).string().not_null())
                    .col(
                        ColumnDef::new(Lessons::DurationSeconds)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Lessons::OrderIndex).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Lessons::Table, Lessons::ChapterId)
                            .to(Chapters::Table, Chapters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建测验表
        manager
            .create_table(
                Table::create()
                    .table(Quizzes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Quizzes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Quizzes::CourseVersionId).big_integer().not_null())
                    .col(ColumnDef::new(Quizzes::LessonId).big_integer().null())
                    .col(ColumnDef::new(Quizzes::Title).string().not_null())
                    .col(ColumnDef::new(Quizzes::MaxAttempts).integer().null())
                    .col(ColumnDef::new(Quizzes::TimeLimitMinutes).integer().null())
                    .col(ColumnDef::new(Quizzes::PassingScore).double().null())
                    .col(
                        ColumnDef::new(Quizzes::RandomizeQuestions)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Quizzes::RandomizeOptions)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Quizzes::TotalPoints).double().not_null())
                    .col(
                        ColumnDef::new(Quizzes::IsFinalExam)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Quizzes::Table, Quizzes::CourseVersionId)
                            .to(CourseVersions::Table, CourseVersions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建题目表
        manager
            .create_table(
                Table::create()
                    .table(QuizQuestions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuizQuestions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QuizQuestions::QuizId).big_integer().not_null())
                    .col(ColumnDef::new(QuizQuestions::QuestionType).string().not_null())
                    .col(ColumnDef::new(QuizQuestions::Content).text().not_null())
                    .col(ColumnDef::new(QuizQuestions::Points).double().not_null())
                    .col(ColumnDef::new(QuizQuestions::OrderIndex).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuizQuestions::Table, QuizQuestions::QuizId)
                            .to(Quizzes::Table, Quizzes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建选项表
        manager
            .create_table(
                Table::create()
                    .table(AnswerOptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AnswerOptions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AnswerOptions::QuestionId).big_integer().not_null())
                    .col(ColumnDef::new(AnswerOptions::Content).text().not_null())
                    .col(
                        ColumnDef::new(AnswerOptions::IsCorrect)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(AnswerOptions::OrderIndex).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(AnswerOptions::Table, AnswerOptions::QuestionId)
                            .to(QuizQuestions::Table, QuizQuestions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建作业表
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assignments::CourseVersionId).big_integer().not_null())
                    .col(ColumnDef::new(Assignments::LessonId).big_integer().null())
                    .col(ColumnDef::new(Assignments::Title).string().not_null())
                    .col(ColumnDef::new(Assignments::TotalPoints).double().not_null())
                    .col(ColumnDef::new(Assignments::TimeLimitMinutes).integer().null())
                    .col(ColumnDef::new(Assignments::MaxAttempts).integer().null())
                    .col(ColumnDef::new(Assignments::DueAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::CourseVersionId)
                            .to(CourseVersions::Table, CourseVersions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建支付流水表
        manager
            .create_table(
                Table::create()
                    .table(PaymentTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentTransactions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PaymentTransactions::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentTransactions::CourseVersionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentTransactions::Amount).double().not_null())
                    .col(ColumnDef::new(PaymentTransactions::Status).string().not_null())
                    .col(
                        ColumnDef::new(PaymentTransactions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建选课表
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Enrollments::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Enrollments::CourseVersionId).big_integer().not_null())
                    .col(ColumnDef::new(Enrollments::Status).string().not_null())
                    .col(ColumnDef::new(Enrollments::EnrolledAt).big_integer().not_null())
                    .col(ColumnDef::new(Enrollments::StartAt).big_integer().not_null())
                    .col(ColumnDef::new(Enrollments::EndAt).big_integer().null())
                    .col(
                        ColumnDef::new(Enrollments::CompletionPercentage)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Enrollments::AverageScore).double().null())
                    .col(ColumnDef::new(Enrollments::FinalExamScore).double().null())
                    .col(ColumnDef::new(Enrollments::FinalExamWeight).double().not_null())
                    .col(ColumnDef::new(Enrollments::PassScore).double().not_null())
                    .col(ColumnDef::new(Enrollments::MinProgressPct).double().not_null())
                    .col(
                        ColumnDef::new(Enrollments::CertificateIssued)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Enrollments::CertificateId).big_integer().null())
                    .col(ColumnDef::new(Enrollments::CompletedAt).big_integer().null())
                    .col(ColumnDef::new(Enrollments::CancellationReason).text().null())
                    .col(ColumnDef::new(Enrollments::CancelledAt).big_integer().null())
                    .col(ColumnDef::new(Enrollments::BanReason).text().null())
                    .col(ColumnDef::new(Enrollments::BannedAt).big_integer().null())
                    .col(
                        ColumnDef::new(Enrollments::PaymentTransactionId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Enrollments::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Enrollments::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::CourseVersionId)
                            .to(CourseVersions::Table, CourseVersions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学习进度表
        manager
            .create_table(
                Table::create()
                    .table(Progress::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Progress::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Progress::EnrollmentId).big_integer().not_null())
                    .col(ColumnDef::new(Progress::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Progress::LessonId).big_integer().not_null())
                    .col(ColumnDef::new(Progress::Status).string().not_null())
                    .col(ColumnDef::new(Progress::ViewedAt).big_integer().null())
                    .col(
                        ColumnDef::new(Progress::TimesViewed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Progress::WatchedDurationSeconds)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Progress::WatchedPercentage)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Progress::CompletedAt).big_integer().null())
                    .col(
                        ColumnDef::new(Progress::IsBookmarked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Progress::Notes).text().null())
                    .col(ColumnDef::new(Progress::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Progress::Table, Progress::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Progress::Table, Progress::LessonId)
                            .to(Lessons::Table, Lessons::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建测验作答表
        manager
            .create_table(
                Table::create()
                    .table(QuizAttempts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuizAttempts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QuizAttempts::QuizId).big_integer().not_null())
                    .col(ColumnDef::new(QuizAttempts::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(QuizAttempts::EnrollmentId).big_integer().not_null())
                    .col(ColumnDef::new(QuizAttempts::AttemptNumber).integer().not_null())
                    .col(ColumnDef::new(QuizAttempts::Status).string().not_null())
                    .col(ColumnDef::new(QuizAttempts::StartedAt).big_integer().not_null())
                    .col(ColumnDef::new(QuizAttempts::FinishedAt).big_integer().null())
                    .col(ColumnDef::new(QuizAttempts::TotalScore).double().null())
                    .col(ColumnDef::new(QuizAttempts::ShuffleSeed).big_integer().not_null())
                    .col(ColumnDef::new(QuizAttempts::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuizAttempts::Table, QuizAttempts::QuizId)
                            .to(Quizzes::Table, Quizzes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuizAttempts::Table, QuizAttempts::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建单题作答表
        manager
            .create_table(
                Table::create()
                    .table(QuizAttemptAnswers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuizAttemptAnswers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QuizAttemptAnswers::AttemptId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuizAttemptAnswers::QuestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuizAttemptAnswers::SelectedOptionIds).text().null())
                    .col(ColumnDef::new(QuizAttemptAnswers::TextAnswer).text().null())
                    .col(ColumnDef::new(QuizAttemptAnswers::Score).double().null())
                    .col(
                        ColumnDef::new(QuizAttemptAnswers::IsGraded)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(QuizAttemptAnswers::GradedBy).big_integer().null())
                    .col(ColumnDef::new(QuizAttemptAnswers::Feedback).text().null())
                    .col(
                        ColumnDef::new(QuizAttemptAnswers::AnsweredAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuizAttemptAnswers::Table, QuizAttemptAnswers::AttemptId)
                            .to(QuizAttempts::Table, QuizAttempts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建作业提交表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Submissions::AssignmentId).big_integer().not_null())
                    .col(ColumnDef::new(Submissions::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Submissions::EnrollmentId).big_integer().not_null())
                    .col(ColumnDef::new(Submissions::AttemptNumber).integer().not_null())
                    .col(
                        ColumnDef::new(Submissions::PreviousSubmissionId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Submissions::Content).text().not_null())
                    .col(ColumnDef::new(Submissions::Status).string().not_null())
                    .col(ColumnDef::new(Submissions::Score).double().null())
                    .col(ColumnDef::new(Submissions::Feedback).text().null())
                    .col(ColumnDef::new(Submissions::GradedBy).big_integer().null())
                    .col(ColumnDef::new(Submissions::GradedAt).big_integer().null())
                    .col(ColumnDef::new(Submissions::SubmittedAt).big_integer().not_null())
                    .col(ColumnDef::new(Submissions::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建证书表
        manager
            .create_table(
                Table::create()
                    .table(Certificates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Certificates::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Certificates::EnrollmentId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Certificates::StudentId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Certificates::CourseVersionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Certificates::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Certificates::FinalScore).double().not_null())
                    .col(ColumnDef::new(Certificates::IssuedAt).big_integer().not_null())
                    .col(
                        ColumnDef::new(Certificates::Revoked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Certificates::RevokedAt).big_integer().null())
                    .col(ColumnDef::new(Certificates::RevokedBy).big_integer().null())
                    .col(ColumnDef::new(Certificates::RevokeReason).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Certificates::Table, Certificates::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_progress_enrollment_lesson")
                    .table(Progress::Table)
                    .col(Progress::EnrollmentId)
                    .col(Progress::LessonId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_quiz_attempts_number")
                    .table(QuizAttempts::Table)
                    .col(QuizAttempts::QuizId)
                    .col(QuizAttempts::StudentId)
                    .col(QuizAttempts::AttemptNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_quiz_attempt_answers_question")
                    .table(QuizAttemptAnswers::Table)
                    .col(QuizAttemptAnswers::AttemptId)
                    .col(QuizAttemptAnswers::QuestionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_submissions_attempt")
                    .table(Submissions::Table)
                    .col(Submissions::AssignmentId)
                    .col(Submissions::StudentId)
                    .col(Submissions::AttemptNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollments_student_course")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollments_status_end_at")
                    .table(Enrollments::Table)
                    .col(Enrollments::Status)
                    .col(Enrollments::EndAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollments_course")
                    .table(Enrollments::Table)
                    .col(Enrollments::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_assignment")
                    .table(Submissions::Table)
                    .col(Submissions::AssignmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_quiz_attempts_status")
                    .table(QuizAttempts::Table)
                    .col(QuizAttempts::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lessons_chapter")
                    .table(Lessons::Table)
                    .col(Lessons::ChapterId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按依赖关系逆序删除表
        manager
            .drop_table(Table::drop().table(Certificates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuizAttemptAnswers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuizAttempts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Progress::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AnswerOptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuizQuestions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Quizzes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Lessons::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Chapters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseVersions::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum CourseVersions {
    #[sea_orm(iden = "course_versions")]
    Table,
    Id,
    CourseId,
    TeacherId,
    VersionNumber,
    Title,
    Price,
    DurationDays,
    PassScore,
    FinalWeight,
    MinProgressPct,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Chapters {
    #[sea_orm(iden = "chapters")]
    Table,
    Id,
    CourseVersionId,
    Title,
    OrderIndex,
}

#[derive(DeriveIden)]
enum Lessons {
    #[sea_orm(iden = "lessons")]
    Table,
    Id,
    ChapterId,
    CourseVersionId,
    Title,
    LessonType,
    DurationSeconds,
    OrderIndex,
}

#[derive(DeriveIden)]
enum Quizzes {
    #[sea_orm(iden = "quizzes")]
    Table,
    Id,
    CourseVersionId,
    LessonId,
    Title,
    MaxAttempts,
    TimeLimitMinutes,
    PassingScore,
    RandomizeQuestions,
    RandomizeOptions,
    TotalPoints,
    IsFinalExam,
}

#[derive(DeriveIden)]
enum QuizQuestions {
    #[sea_orm(iden = "quiz_questions")]
    Table,
    Id,
    QuizId,
    QuestionType,
    Content,
    Points,
    OrderIndex,
}

#[derive(DeriveIden)]
enum AnswerOptions {
    #[sea_orm(iden = "answer_options")]
    Table,
    Id,
    QuestionId,
    Content,
    IsCorrect,
    OrderIndex,
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    CourseVersionId,
    LessonId,
    Title,
    TotalPoints,
    TimeLimitMinutes,
    MaxAttempts,
    DueAt,
}

#[derive(DeriveIden)]
enum PaymentTransactions {
    #[sea_orm(iden = "payment_transactions")]
    Table,
    Id,
    StudentId,
    CourseVersionId,
    Amount,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Enrollments {
    #[sea_orm(iden = "enrollments")]
    Table,
    Id,
    StudentId,
    CourseId,
    CourseVersionId,
    Status,
    EnrolledAt,
    StartAt,
    EndAt,
    CompletionPercentage,
    AverageScore,
    FinalExamScore,
    FinalExamWeight,
    PassScore,
    MinProgressPct,
    CertificateIssued,
    CertificateId,
    CompletedAt,
    CancellationReason,
    CancelledAt,
    BanReason,
    BannedAt,
    PaymentTransactionId,
    Version,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Progress {
    #[sea_orm(iden = "progress")]
    Table,
    Id,
    EnrollmentId,
    StudentId,
    LessonId,
    Status,
    ViewedAt,
    TimesViewed,
    WatchedDurationSeconds,
    WatchedPercentage,
    CompletedAt,
    IsBookmarked,
    Notes,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum QuizAttempts {
    #[sea_orm(iden = "quiz_attempts")]
    Table,
    Id,
    QuizId,
    StudentId,
    EnrollmentId,
    AttemptNumber,
    Status,
    StartedAt,
    FinishedAt,
    TotalScore,
    ShuffleSeed,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum QuizAttemptAnswers {
    #[sea_orm(iden = "quiz_attempt_answers")]
    Table,
    Id,
    AttemptId,
    QuestionId,
    SelectedOptionIds,
    TextAnswer,
    Score,
    IsGraded,
    GradedBy,
    Feedback,
    AnsweredAt,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    AssignmentId,
    StudentId,
    EnrollmentId,
    AttemptNumber,
    PreviousSubmissionId,
    Content,
    Status,
    Score,
    Feedback,
    GradedBy,
    GradedAt,
    SubmittedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Certificates {
    #[sea_orm(iden = "certificates")]
    Table,
    Id,
    EnrollmentId,
    StudentId,
    CourseVersionId,
    Code,
    FinalScore,
    IssuedAt,
    Revoked,
    RevokedAt,
    RevokedBy,
    RevokeReason,
}
