use std::collections::HashMap;

use super::ProgressService;
use crate::errors::{LmsError, Result};
use crate::models::Principal;
use crate::models::courses::entities::{Chapter, CourseOutline, Lesson};
use crate::models::enrollments::entities::Enrollment;
use crate::models::progress::{
    entities::{Progress, ProgressStatus},
    responses::{ChapterProgress, CourseProgress, LessonProgress},
};
use crate::services::EngineContext;
use crate::services::enrollments::guard::load_locked;
use crate::utils::LockKey;
use crate::utils::score::percentage;

fn lesson_view(lesson: &Lesson, progress: Option<&Progress>) -> LessonProgress {
    match progress {
        Some(p) => LessonProgress {
            lesson_id: lesson.id,
            title: lesson.title.clone(),
            status: p.status,
            times_viewed: p.times_viewed,
            watched_duration_seconds: p.watched_duration_seconds,
            watched_percentage: p.watched_percentage,
            is_bookmarked: p.is_bookmarked,
        },
        None => LessonProgress {
            lesson_id: lesson.id,
            title: lesson.title.clone(),
            status: ProgressStatus::NotStarted,
            times_viewed: 0,
            watched_duration_seconds: 0,
            watched_percentage: 0.0,
            is_bookmarked: false,
        },
    }
}

fn chapter_view(chapter: &Chapter, by_lesson: &HashMap<i64, &Progress>) -> ChapterProgress {
    let lessons: Vec<LessonProgress> = chapter
        .lessons
        .iter()
        .map(|l| lesson_view(l, by_lesson.get(&l.id).copied()))
        .collect();
    let completed = lessons
        .iter()
        .filter(|l| l.status == ProgressStatus::Completed)
        .count();

    ChapterProgress {
        chapter_id: chapter.id,
        title: chapter.title.clone(),
        total_lessons: lessons.len(),
        completed_lessons: completed,
        completion_percentage: percentage(completed as f64, lessons.len() as f64),
        lessons,
    }
}

/// 按大纲汇总进度，没有进度记录的课时视为未开始；不属于大纲的记录被忽略
pub fn summarize(enrollment_id: i64, outline: &CourseOutline, progress: &[Progress]) -> CourseProgress {
    let by_lesson: HashMap<i64, &Progress> = progress.iter().map(|p| (p.lesson_id, p)).collect();
    let chapters: Vec<ChapterProgress> = outline
        .chapters
        .iter()
        .map(|c| chapter_view(c, &by_lesson))
        .collect();

    let total = outline.total_lessons();
    let completed: usize = chapters.iter().map(|c| c.completed_lessons).sum();
    let lessons = || chapters.iter().flat_map(|c| c.lessons.iter());
    let viewed = lessons()
        .filter(|l| l.status != ProgressStatus::NotStarted)
        .count();
    let watched: i64 = lessons().map(|l| l.watched_duration_seconds).sum();

    CourseProgress {
        enrollment_id,
        course_version_id: outline.course_version_id,
        total_lessons: total,
        completed_lessons: completed,
        viewed_lessons: viewed,
        completion_percentage: percentage(completed as f64, total as f64),
        total_duration_seconds: outline.total_duration_seconds(),
        watched_duration_seconds: watched,
        chapters,
    }
}

/// 从子记录实时计算选课的课程进度
pub(crate) async fn course_progress_for(
    ctx: &EngineContext,
    enrollment: &Enrollment,
) -> Result<CourseProgress> {
    let outline = ctx.outline(enrollment.course_version_id).await?;
    let progress = ctx
        .storage
        .list_progress_by_enrollment(enrollment.id)
        .await?;
    Ok(summarize(enrollment.id, &outline, &progress))
}

pub(crate) async fn load_viewable(
    ctx: &EngineContext,
    principal: &Principal,
    enrollment_id: i64,
) -> Result<Enrollment> {
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;
    let enrollment = load_locked(ctx, enrollment_id).await?;
    principal.ensure_can_view(enrollment.student_id)?;
    Ok(enrollment)
}

pub async fn get_lesson_progress(
    service: &ProgressService,
    principal: &Principal,
    enrollment_id: i64,
    lesson_id: i64,
) -> Result<LessonProgress> {
    let ctx = service.ctx();
    let enrollment = load_viewable(ctx, principal, enrollment_id).await?;

    let outline = ctx.outline(enrollment.course_version_id).await?;
    let lesson = outline
        .lesson(lesson_id)
        .ok_or_else(|| LmsError::not_found(format!("lesson {lesson_id}")))?;
    let progress = ctx.storage.get_progress(enrollment_id, lesson_id).await?;
    Ok(lesson_view(lesson, progress.as_ref()))
}

pub async fn get_chapter_progress(
    service: &ProgressService,
    principal: &Principal,
    enrollment_id: i64,
    chapter_id: i64,
) -> Result<ChapterProgress> {
    let ctx = service.ctx();
    let enrollment = load_viewable(ctx, principal, enrollment_id).await?;

    let course = course_progress_for(ctx, &enrollment).await?;
    course
        .chapters
        .into_iter()
        .find(|c| c.chapter_id == chapter_id)
        .ok_or_else(|| LmsError::not_found(format!("chapter {chapter_id}")))
}

pub async fn get_course_progress(
    service: &ProgressService,
    principal: &Principal,
    enrollment_id: i64,
) -> Result<CourseProgress> {
    let ctx = service.ctx();
    let enrollment = load_viewable(ctx, principal, enrollment_id).await?;
    course_progress_for(ctx, &enrollment).await
}
