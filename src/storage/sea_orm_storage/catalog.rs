//! 课程目录存储操作（只读）

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::answer_options::{Column as OptionColumn, Entity as AnswerOptions};
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::chapters::{Column as ChapterColumn, Entity as Chapters};
use crate::entity::course_versions::{Column as CourseVersionColumn, Entity as CourseVersions};
use crate::entity::lessons::{Column as LessonColumn, Entity as Lessons};
use crate::entity::payment_transactions::Entity as PaymentTransactions;
use crate::entity::quiz_questions::{Column as QuestionColumn, Entity as QuizQuestions};
use crate::entity::quizzes::{Column as QuizColumn, Entity as Quizzes, Model as QuizModel};
use crate::errors::{LmsError, Result};
use crate::models::{
    assignments::entities::Assignment,
    courses::entities::{CourseOutline, CourseVersion, Lesson},
    payments::entities::PaymentTransaction,
    quizzes::entities::{AnswerOption, Quiz},
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 通过 ID 获取课程版本
    pub async fn get_course_version_impl(&self, id: i64) -> Result<Option<CourseVersion>> {
        let result = CourseVersions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程版本失败: {e}")))?;

        result.map(|m| m.into_course_version()).transpose()
    }

    /// 列出课程的全部版本
    pub async fn list_course_versions_by_course_impl(
        &self,
        course_id: i64,
    ) -> Result<Vec<CourseVersion>> {
        let models = CourseVersions::find()
            .filter(CourseVersionColumn::CourseId.eq(course_id))
            .order_by_asc(CourseVersionColumn::VersionNumber)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程版本列表失败: {e}")))?;

        models.into_iter().map(|m| m.into_course_version()).collect()
    }

    /// 获取课程大纲
    pub async fn get_course_outline_impl(&self, course_version_id: i64) -> Result<CourseOutline> {
        let chapters = Chapters::find()
            .filter(ChapterColumn::CourseVersionId.eq(course_version_id))
            .order_by_asc(ChapterColumn::OrderIndex)
            .order_by_asc(ChapterColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询章节失败: {e}")))?;

        let lessons = Lessons::find()
            .filter(LessonColumn::CourseVersionId.eq(course_version_id))
            .order_by_asc(LessonColumn::OrderIndex)
            .order_by_asc(LessonColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课时失败: {e}")))?;

        // 按章节分组
        let mut grouped: HashMap<i64, Vec<Lesson>> = HashMap::new();
        for lesson in lessons {
            let lesson = lesson.into_lesson()?;
            grouped.entry(lesson.chapter_id).or_default().push(lesson);
        }

        let chapters = chapters
            .into_iter()
            .map(|chapter| {
                let lessons = grouped.remove(&chapter.id).unwrap_or_default();
                chapter.into_chapter(lessons)
            })
            .collect();

        Ok(CourseOutline {
            course_version_id,
            chapters,
        })
    }

    /// 通过 ID 获取课时
    pub async fn get_lesson_impl(&self, lesson_id: i64) -> Result<Option<Lesson>> {
        let result = Lessons::find_by_id(lesson_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课时失败: {e}")))?;

        result.map(|m| m.into_lesson()).transpose()
    }

    /// 通过 ID 获取测验
    pub async fn get_quiz_impl(&self, quiz_id: i64) -> Result<Option<Quiz>> {
        let result = Quizzes::find_by_id(quiz_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询测验失败: {e}")))?;

        match result {
            Some(model) => Ok(Some(self.load_quiz_tree(model).await?)),
            None => Ok(None),
        }
    }

    /// 列出课程版本下的测验
    pub async fn list_quizzes_by_course_version_impl(
        &self,
        course_version_id: i64,
    ) -> Result<Vec<Quiz>> {
        let models = Quizzes::find()
            .filter(QuizColumn::CourseVersionId.eq(course_version_id))
            .order_by_asc(QuizColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询测验列表失败: {e}")))?;

        let mut quizzes = Vec::with_capacity(models.len());
        for model in models {
            quizzes.push(self.load_quiz_tree(model).await?);
        }
        Ok(quizzes)
    }

    /// 加载测验的题目与选项
    async fn load_quiz_tree(&self, quiz: QuizModel) -> Result<Quiz> {
        let questions = QuizQuestions::find()
            .filter(QuestionColumn::QuizId.eq(quiz.id))
            .order_by_asc(QuestionColumn::OrderIndex)
            .order_by_asc(QuestionColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询题目失败: {e}")))?;

        let question_ids: Vec<i64> = questions.iter().map(|q| q.id).collect();
        let options = if question_ids.is_empty() {
            Vec::new()
        } else {
            AnswerOptions::find()
                .filter(OptionColumn::QuestionId.is_in(question_ids))
                .order_by_asc(OptionColumn::OrderIndex)
                .order_by_asc(OptionColumn::Id)
                .all(&self.db)
                .await
                .map_err(|e| LmsError::database_operation(format!("查询选项失败: {e}")))?
        };

        let mut grouped: HashMap<i64, Vec<AnswerOption>> = HashMap::new();
        for option in options {
            grouped
                .entry(option.question_id)
                .or_default()
                .push(option.into_option());
        }

        let questions = questions
            .into_iter()
            .map(|q| {
                let options = grouped.remove(&q.id).unwrap_or_default();
                q.into_question(options)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(quiz.into_quiz(questions))
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 列出课程版本下的作业
    pub async fn list_assignments_by_course_version_impl(
        &self,
        course_version_id: i64,
    ) -> Result<Vec<Assignment>> {
        let models = Assignments::find()
            .filter(AssignmentColumn::CourseVersionId.eq(course_version_id))
            .order_by_asc(AssignmentColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_assignment()).collect())
    }

    /// 通过 ID 获取支付流水
    pub async fn get_payment_transaction_impl(
        &self,
        id: i64,
    ) -> Result<Option<PaymentTransaction>> {
        let result = PaymentTransactions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询支付流水失败: {e}")))?;

        result.map(|m| m.into_payment()).transpose()
    }
}
