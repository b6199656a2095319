use super::ProgressService;
use super::track::{prepare_write, save};
use crate::errors::{LmsError, Result};
use crate::models::Principal;
use crate::models::progress::entities::Progress;
use crate::utils::LockKey;

/// 笔记最大字符数
const MAX_NOTES_CHARS: usize = 10_000;

pub async fn set_bookmark(
    service: &ProgressService,
    principal: &Principal,
    enrollment_id: i64,
    lesson_id: i64,
    bookmarked: bool,
) -> Result<Progress> {
    let ctx = service.ctx();
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;

    let (_, _, mut progress) = prepare_write(ctx, principal, enrollment_id, lesson_id).await?;
    progress.is_bookmarked = bookmarked;
    progress.updated_at = ctx.now();
    save(ctx, &progress).await
}

pub async fn update_notes(
    service: &ProgressService,
    principal: &Principal,
    enrollment_id: i64,
    lesson_id: i64,
    notes: Option<String>,
) -> Result<Progress> {
    let notes = notes.filter(|n| !n.trim().is_empty());
    if let Some(ref text) = notes
        && text.chars().count() > MAX_NOTES_CHARS
    {
        return Err(LmsError::validation(format!(
            "notes exceed {MAX_NOTES_CHARS} characters"
        )));
    }

    let ctx = service.ctx();
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;

    let (_, _, mut progress) = prepare_write(ctx, principal, enrollment_id, lesson_id).await?;
    progress.notes = notes;
    progress.updated_at = ctx.now();
    save(ctx, &progress).await
}
