use std::collections::HashMap;

use tracing::{error, info};

use super::QuizAttemptService;
use super::finish::{expire_attempt_locked, load_quiz};
use crate::errors::Result;
use crate::models::quizzes::entities::{Quiz, QuizAttemptStatus};
use crate::utils::LockKey;

pub async fn sweep_timed_out(service: &QuizAttemptService) -> Result<usize> {
    let ctx = service.ctx();
    let open = ctx.storage.list_in_progress_attempts().await?;

    // 读取失败的测验记为 None，本轮不再重试
    let mut quizzes: HashMap<i64, Option<Quiz>> = HashMap::new();
    let mut expired = 0;
    for candidate in open {
        if !quizzes.contains_key(&candidate.quiz_id) {
            let quiz = match load_quiz(ctx, candidate.quiz_id).await {
                Ok(quiz) => Some(quiz),
                Err(e) => {
                    error!(
                        "Skipping attempts of quiz {} during sweep: {}",
                        candidate.quiz_id, e
                    );
                    None
                }
            };
            quizzes.insert(candidate.quiz_id, quiz);
        }
        let Some(Some(quiz)) = quizzes.get(&candidate.quiz_id) else {
            continue;
        };
        let now = ctx.now();
        if !quiz.is_overdue(candidate.started_at, now) {
            continue;
        }

        let _guard = ctx
            .locks
            .lock(LockKey::Enrollment(candidate.enrollment_id))
            .await;
        // 加锁后重新读取，作答可能已交卷
        let current = match ctx.storage.get_quiz_attempt(candidate.id).await {
            Ok(Some(current)) if current.status == QuizAttemptStatus::InProgress => current,
            Ok(_) => continue,
            Err(e) => {
                error!("Failed to reload quiz attempt {}: {}", candidate.id, e);
                continue;
            }
        };
        match expire_attempt_locked(ctx, current, None).await {
            Ok(_) => expired += 1,
            Err(e) => error!("Failed to expire quiz attempt {}: {}", candidate.id, e),
        }
    }

    if expired > 0 {
        info!("Attempt sweep finished: {} attempt(s) expired", expired);
    }
    Ok(expired)
}
