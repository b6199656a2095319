use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::QuizAttemptService;
use super::finish::load_open_attempt;
use super::query::remaining_for;
use crate::errors::Result;
use crate::models::Principal;
use crate::models::quizzes::{
    entities::{Quiz, QuizAttempt},
    responses::{PresentedOption, PresentedQuestion, PresentedQuiz},
};
use crate::utils::LockKey;

/// 按作答种子生成试卷视图，同一作答每次得到相同顺序；不包含正确答案
pub fn present_quiz(
    quiz: &Quiz,
    attempt: &QuizAttempt,
    remaining_seconds: Option<i64>,
) -> PresentedQuiz {
    let mut rng = StdRng::seed_from_u64(attempt.shuffle_seed);

    let mut questions: Vec<PresentedQuestion> = quiz
        .questions
        .iter()
        .map(|q| PresentedQuestion {
            question_id: q.id,
            question_type: q.question_type,
            content: q.content.clone(),
            points: q.points,
            options: q
                .options
                .iter()
                .map(|o| PresentedOption {
                    id: o.id,
                    content: o.content.clone(),
                })
                .collect(),
        })
        .collect();

    if quiz.randomize_questions {
        questions.shuffle(&mut rng);
    }
    if quiz.randomize_options {
        for question in questions.iter_mut() {
            question.options.shuffle(&mut rng);
        }
    }

    PresentedQuiz {
        attempt_id: attempt.id,
        quiz_id: quiz.id,
        title: quiz.title.clone(),
        remaining_seconds,
        questions,
    }
}

pub async fn present(
    service: &QuizAttemptService,
    principal: &Principal,
    attempt_id: i64,
) -> Result<PresentedQuiz> {
    let ctx = service.ctx();
    let enrollment_id = super::finish::enrollment_of(ctx, attempt_id).await?;
    let _guard = ctx.locks.lock(LockKey::Enrollment(enrollment_id)).await;

    let (attempt, quiz) = load_open_attempt(ctx, principal, attempt_id).await?;
    let remaining = remaining_for(&quiz, &attempt, ctx.now());
    Ok(present_quiz(&quiz, &attempt, remaining))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quizzes::entities::{
        AnswerOption, QuestionType, QuizAttemptStatus, QuizQuestion,
    };
    use chrono::{DateTime, Utc};

    fn quiz() -> Quiz {
        let questions = (1..=8)
            .map(|qid| QuizQuestion {
                id: qid,
                quiz_id: 1,
                question_type: QuestionType::SingleChoice,
                content: format!("question {qid}"),
                points: 1.0,
                order_index: qid as i32,
                options: (1..=4)
                    .map(|oid| AnswerOption {
                        id: qid * 10 + oid,
                        question_id: qid,
                        content: format!("option {oid}"),
                        is_correct: oid == 1,
                        order_index: oid as i32,
                    })
                    .collect(),
            })
            .collect();
        Quiz {
            id: 1,
            course_version_id: 1,
            lesson_id: None,
            title: "shuffled".into(),
            max_attempts: None,
            time_limit_minutes: None,
            passing_score: None,
            randomize_questions: true,
            randomize_options: true,
            total_points: 8.0,
            is_final_exam: false,
            questions,
        }
    }

    fn attempt(seed: u64) -> QuizAttempt {
        let ts = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        QuizAttempt {
            id: 1,
            quiz_id: 1,
            student_id: 1,
            enrollment_id: 1,
            attempt_number: 1,
            status: QuizAttemptStatus::InProgress,
            started_at: ts,
            finished_at: None,
            total_score: None,
            shuffle_seed: seed,
            updated_at: ts,
        }
    }

    fn order(view: &PresentedQuiz) -> Vec<i64> {
        view.questions.iter().map(|q| q.question_id).collect()
    }

    #[test]
    fn test_same_seed_same_order() {
        let quiz = quiz();
        let first = present_quiz(&quiz, &attempt(42), None);
        let second = present_quiz(&quiz, &attempt(42), None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_shuffle_keeps_every_question_and_option() {
        let quiz = quiz();
        let view = present_quiz(&quiz, &attempt(7), Some(60));
        let mut ids = order(&view);
        ids.sort();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
        for question in &view.questions {
            let mut options: Vec<i64> = question.options.iter().map(|o| o.id).collect();
            options.sort();
            let expected: Vec<i64> = (1..=4).map(|o| question.question_id * 10 + o).collect();
            assert_eq!(options, expected);
        }
        assert_eq!(view.remaining_seconds, Some(60));
    }

    #[test]
    fn test_no_shuffle_keeps_authored_order() {
        let mut quiz = quiz();
        quiz.randomize_questions = false;
        quiz.randomize_options = false;
        let view = present_quiz(&quiz, &attempt(99), None);
        assert_eq!(order(&view), (1..=8).collect::<Vec<_>>());
        assert_eq!(view.questions[0].options[0].id, 11);
    }
}
