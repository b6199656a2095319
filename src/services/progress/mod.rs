//! 学习进度
//!
//! 每个 (选课, 课时) 一条进度记录，课时完成后触发选课重算。

pub mod annotate;
pub mod stats;
pub mod summary;
pub mod track;

use std::sync::Arc;

use super::EngineContext;
use crate::errors::Result;
use crate::models::Principal;
use crate::models::progress::{
    entities::Progress,
    responses::{ChapterProgress, CourseProgress, CourseProgressStats, LessonProgress},
};

pub struct ProgressService {
    ctx: Arc<EngineContext>,
}

impl ProgressService {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    pub(crate) fn ctx(&self) -> &EngineContext {
        &self.ctx
    }

    // 记录一次观看
    pub async fn record_view(
        &self,
        principal: &Principal,
        enrollment_id: i64,
        lesson_id: i64,
    ) -> Result<Progress> {
        track::record_view(self, principal, enrollment_id, lesson_id).await
    }

    // 上报观看时长（秒）
    pub async fn update_watched_duration(
        &self,
        principal: &Principal,
        enrollment_id: i64,
        lesson_id: i64,
        duration_seconds: i64,
    ) -> Result<Progress> {
        track::update_watched_duration(self, principal, enrollment_id, lesson_id, duration_seconds)
            .await
    }

    // 手动标记完成
    pub async fn mark_complete(
        &self,
        principal: &Principal,
        enrollment_id: i64,
        lesson_id: i64,
    ) -> Result<Progress> {
        track::mark_complete(self, principal, enrollment_id, lesson_id).await
    }

    pub async fn set_bookmark(
        &self,
        principal: &Principal,
        enrollment_id: i64,
        lesson_id: i64,
        bookmarked: bool,
    ) -> Result<Progress> {
        annotate::set_bookmark(self, principal, enrollment_id, lesson_id, bookmarked).await
    }

    pub async fn update_notes(
        &self,
        principal: &Principal,
        enrollment_id: i64,
        lesson_id: i64,
        notes: Option<String>,
    ) -> Result<Progress> {
        annotate::update_notes(self, principal, enrollment_id, lesson_id, notes).await
    }

    pub async fn get_lesson_progress(
        &self,
        principal: &Principal,
        enrollment_id: i64,
        lesson_id: i64,
    ) -> Result<LessonProgress> {
        summary::get_lesson_progress(self, principal, enrollment_id, lesson_id).await
    }

    pub async fn get_chapter_progress(
        &self,
        principal: &Principal,
        enrollment_id: i64,
        chapter_id: i64,
    ) -> Result<ChapterProgress> {
        summary::get_chapter_progress(self, principal, enrollment_id, chapter_id).await
    }

    pub async fn get_course_progress(
        &self,
        principal: &Principal,
        enrollment_id: i64,
    ) -> Result<CourseProgress> {
        summary::get_course_progress(self, principal, enrollment_id).await
    }

    // 课程维度统计（授课教师或管理员）
    pub async fn course_progress_stats(
        &self,
        principal: &Principal,
        course_id: i64,
    ) -> Result<CourseProgressStats> {
        stats::course_progress_stats(self, principal, course_id).await
    }
}
