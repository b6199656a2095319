use tracing::info;

use super::ProgressService;
use crate::errors::{LmsError, Result};
use crate::events::DomainEvent;
use crate::models::Principal;
use crate::models::courses::entities::Lesson;
use crate::models::enrollments::entities::Enrollment;
use crate::models::progress::entities::Progress;
use crate::services::EngineContext;
use crate::services::enrollments::guard::{load_locked, require_active};
use crate::services::enrollments::recompute::recompute_locked;
use crate::utils::LockKey;

/// 写进度前的准备：选课可写、课时属于该课程版本、已有或新建的进度
pub(crate) async fn prepare_write(
    ctx: &EngineContext,
    principal: &Principal,
    enrollment_id: i64,
    lesson_id: i64,
) -> Result<(Enrollment, Lesson, Progress)> {
    let enrollment = load_locked(ctx, enrollment_id).await?;
    principal.ensure_owner(enrollment.student_id)?;
    require_active(&enrollment)?;

    let outline = ctx.outline(enrollment.course_version_id).await?;
    let lesson = outline.lesson(lesson_id).cloned().ok_or_else(|| {
        LmsError::not_found(format!(
            "lesson {lesson_id} in course version {}",
            enrollment.course_version_id
        ))
    })?;

    let progress = match ctx.storage.get_progress(enrollment_id, lesson_id).await? {
        Some(progress) => progress,
        None => Progress::new(enrollment_id, enrollment.student_id, lesson_id, ctx.now()),
    };
    Ok((enrollment, lesson, progress))
}

pub(crate) async fn save(ctx: &EngineContext, progress: &Progress) -> Result<Progress> {
    if progress.is_persisted() {
        ctx.storage.update_progress(progress).await
    } else {
        ctx.storage.create_progress(progress).await
    }
}

/// 课时完成后发布事件并重算选课
async fn on_lesson_completed(
    ctx: &EngineContext,
    principal: &Principal,
    progress: &Progress,
) -> Result<()> {
    info!(
        "Lesson {} completed for enrollment {}",
        progress.lesson_id, progress.enrollment_id
    );
    ctx.publish(
        Some(principal.account_id),
        DomainEvent::LessonCompleted {
            enrollment_id: progress.enrollment_id,
            lesson_id: progress.lesson_id,
        },
    );
    recompute_locked(ctx, progress.enrollment_id, Some(principal.account_id)).await?;
    Ok(())
}

pub async fn record_view(
    service: &ProgressService,
    principal: &Principal,
    enrollment_id: i64,
    lesson_id: i64,
) -> Result<Progress> {
    let ctx = service.ctx();
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;

    let (_, _, mut progress) = prepare_write(ctx, principal, enrollment_id, lesson_id).await?;
    progress.record_view(ctx.now());
    save(ctx, &progress).await
}

pub async fn update_watched_duration(
    service: &ProgressService,
    principal: &Principal,
    enrollment_id: i64,
    lesson_id: i64,
    duration_seconds: i64,
) -> Result<Progress> {
    if duration_seconds < 0 {
        return Err(LmsError::validation(format!(
            "watched duration must be non-negative, got {duration_seconds}"
        )));
    }

    let ctx = service.ctx();
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;

    let (_, lesson, mut progress) =
        prepare_write(ctx, principal, enrollment_id, lesson_id).await?;
    let crossed = progress.apply_watched_duration(
        duration_seconds,
        lesson.duration_seconds,
        ctx.policy.completion_threshold_pct,
        ctx.now(),
    );
    let progress = save(ctx, &progress).await?;

    if crossed {
        on_lesson_completed(ctx, principal, &progress).await?;
    } else if progress.is_completed() {
        // 上次重算可能失败，已完成的课时每次写入都补一次
        recompute_locked(ctx, enrollment_id, Some(principal.account_id)).await?;
    }
    Ok(progress)
}

pub async fn mark_complete(
    service: &ProgressService,
    principal: &Principal,
    enrollment_id: i64,
    lesson_id: i64,
) -> Result<Progress> {
    let ctx = service.ctx();
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;

    let (_, _, mut progress) = prepare_write(ctx, principal, enrollment_id, lesson_id).await?;
    if !progress.mark_completed(ctx.now()) {
        recompute_locked(ctx, enrollment_id, Some(principal.account_id)).await?;
        return Ok(progress);
    }
    let progress = save(ctx, &progress).await?;
    on_lesson_completed(ctx, principal, &progress).await?;
    Ok(progress)
}
