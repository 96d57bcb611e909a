//! Exam attempt lifecycle: start, answer capture, submission and result lookup.
//!
//! An attempt moves `InProgress -> Completed` exactly once, either on explicit
//! submission or when an access finds the time limit exceeded. Every operation
//! takes `now` explicitly so the timing rules stay testable.

use std::collections::{BTreeMap, HashMap};

use time::PrimitiveDateTime;

use crate::core::metrics::{
    ANSWERS_RECORDED_TOTAL, ATTEMPTS_COMPLETED_TOTAL, ATTEMPTS_STARTED_TOTAL,
};
use crate::db::models::{Exam, ExamAttempt, Question, User};
use crate::db::types::OptionLabel;
use crate::services::attempt_codes::{generate_attempt_code, is_valid_attempt_code, normalize_code};
use crate::services::attempt_timing::{is_timed_out, remaining_seconds};
use crate::services::error::PortalError;
use crate::services::{sampling, scoring};
use crate::store::{AnswerUpsert, AttemptCompletion, NewAttempt, PortalStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompletionTrigger {
    Manual,
    Timeout,
}

impl CompletionTrigger {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Timeout => "timeout",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct StartOutcome {
    pub(crate) attempt: ExamAttempt,
    pub(crate) resumed: bool,
}

/// State of an open attempt as shown to its owner.
#[derive(Debug, Clone)]
pub(crate) struct AttemptView {
    pub(crate) attempt: ExamAttempt,
    pub(crate) exam: Exam,
    pub(crate) questions: Vec<Question>,
    pub(crate) answers: BTreeMap<i64, OptionLabel>,
    pub(crate) remaining_seconds: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct AttemptResult {
    pub(crate) attempt: ExamAttempt,
    pub(crate) exam: Exam,
    pub(crate) username: String,
    pub(crate) passed: bool,
}

#[derive(Debug, Clone)]
pub(crate) enum TakeOutcome {
    InProgress(AttemptView),
    Completed(AttemptResult),
}

pub(crate) async fn start_attempt<S>(
    store: &S,
    user: &User,
    exam_id: i64,
    now: PrimitiveDateTime,
) -> Result<StartOutcome, PortalError>
where
    S: PortalStore + ?Sized,
{
    start_attempt_with(store, user, exam_id, now, generate_attempt_code).await
}

/// Same as [`start_attempt`], drawing candidate codes from `next_code`.
pub(crate) async fn start_attempt_with<S, F>(
    store: &S,
    user: &User,
    exam_id: i64,
    now: PrimitiveDateTime,
    mut next_code: F,
) -> Result<StartOutcome, PortalError>
where
    S: PortalStore + ?Sized,
    F: FnMut() -> String + Send,
{
    let exam = load_exam(store, exam_id).await?;
    if !exam.is_active_at(now) {
        return Err(PortalError::ExamInactive);
    }

    if store.find_attempt_for_user(&user.id, exam.id, true).await?.is_some() {
        return Err(PortalError::AlreadyCompleted);
    }

    if let Some(attempt) = store.find_attempt_for_user(&user.id, exam.id, false).await? {
        tracing::info!(
            attempt_code = %attempt.code,
            user_id = %user.id,
            exam_id = exam.id,
            "Resumed exam attempt"
        );
        return Ok(StartOutcome { attempt, resumed: true });
    }

    let bank = store.list_questions(exam.id).await?;
    let (question_ids, total_marks) = {
        let picked =
            sampling::sample_questions(&bank, exam.number_of_questions, &mut rand::thread_rng());
        let ids: Vec<i64> = picked.iter().map(|question| question.id).collect();
        (ids, scoring::total_marks(picked))
    };

    // Codes are retried until one is free; the insert itself guards the unique index.
    let attempt = loop {
        let code = next_code();
        if store.attempt_code_exists(&code).await? {
            tracing::debug!(attempt_code = %code, "Attempt code collision, regenerating");
            continue;
        }

        let inserted = store
            .insert_attempt(NewAttempt {
                code: code.clone(),
                user_id: user.id.clone(),
                exam_id: exam.id,
                start_time: now,
                total_marks,
                question_ids: question_ids.clone(),
            })
            .await?;

        match inserted {
            Some(attempt) => break attempt,
            None => {
                tracing::debug!(attempt_code = %code, "Attempt code taken concurrently, regenerating");
            }
        }
    };

    metrics::counter!(ATTEMPTS_STARTED_TOTAL).increment(1);
    tracing::info!(
        attempt_code = %attempt.code,
        user_id = %user.id,
        exam_id = exam.id,
        questions = attempt.question_ids().len(),
        total_marks,
        "Started exam attempt"
    );

    Ok(StartOutcome { attempt, resumed: false })
}

/// Records `answers` (question id to option label) and returns the current state.
///
/// Answers for questions outside the frozen sample are ignored. When `finish` is set,
/// or the time limit has run out, the attempt is submitted and its result returned.
pub(crate) async fn take_attempt<S>(
    store: &S,
    user: &User,
    raw_code: &str,
    answers: &BTreeMap<i64, String>,
    finish: bool,
    now: PrimitiveDateTime,
) -> Result<TakeOutcome, PortalError>
where
    S: PortalStore + ?Sized,
{
    let attempt = load_attempt(store, raw_code).await?;
    ensure_owner(&attempt, user)?;
    if attempt.is_completed {
        return Err(PortalError::AlreadyCompleted);
    }

    let exam = load_exam(store, attempt.exam_id).await?;

    if is_timed_out(attempt.start_time, exam.duration_minutes, now) {
        tracing::info!(attempt_code = %attempt.code, "Attempt time limit exceeded");
        let result =
            finalize(store, attempt, exam, &user.username, CompletionTrigger::Timeout, now)
                .await?;
        return Ok(TakeOutcome::Completed(result));
    }

    let selections = parse_selections(answers)?;
    let questions = store.find_questions_by_ids(attempt.question_ids()).await?;
    let by_id: HashMap<i64, &Question> =
        questions.iter().map(|question| (question.id, question)).collect();

    let mut recorded = 0_u64;
    for (question_id, selected) in selections {
        if !attempt.contains_question(question_id) {
            continue;
        }
        let Some(question) = by_id.get(&question_id) else {
            continue;
        };

        let derived = scoring::derive_answer(question, selected);
        let written = store
            .upsert_answer(AnswerUpsert {
                attempt_id: attempt.id,
                question_id,
                selected_answer: selected,
                is_correct: derived.is_correct,
                marks_obtained: derived.marks_obtained,
                updated_at: now,
            })
            .await?;
        if written.is_none() {
            tracing::info!(attempt_code = %attempt.code, "Attempt completed while recording answers");
            return Err(PortalError::AlreadyCompleted);
        }
        recorded += 1;
    }

    if recorded > 0 {
        metrics::counter!(ANSWERS_RECORDED_TOTAL).increment(recorded);
        tracing::debug!(attempt_code = %attempt.code, recorded, "Recorded answers");
    }

    let remaining = remaining_seconds(attempt.start_time, exam.duration_minutes, now);
    if finish || remaining == 0 {
        let trigger = if finish { CompletionTrigger::Manual } else { CompletionTrigger::Timeout };
        let result = finalize(store, attempt, exam, &user.username, trigger, now).await?;
        return Ok(TakeOutcome::Completed(result));
    }

    let answers = store
        .list_answers(attempt.id)
        .await?
        .into_iter()
        .map(|answer| (answer.question_id, answer.selected_answer))
        .collect();

    Ok(TakeOutcome::InProgress(AttemptView {
        attempt,
        exam,
        questions,
        answers,
        remaining_seconds: remaining,
    }))
}

/// Completes the attempt, or returns the stored result when it is already completed.
pub(crate) async fn submit_attempt<S>(
    store: &S,
    user: &User,
    raw_code: &str,
    now: PrimitiveDateTime,
) -> Result<AttemptResult, PortalError>
where
    S: PortalStore + ?Sized,
{
    let attempt = load_attempt(store, raw_code).await?;
    ensure_owner(&attempt, user)?;
    let exam = load_exam(store, attempt.exam_id).await?;

    if attempt.is_completed {
        return Ok(build_result(attempt, exam, user.username.clone()));
    }

    let trigger = if is_timed_out(attempt.start_time, exam.duration_minutes, now) {
        CompletionTrigger::Timeout
    } else {
        CompletionTrigger::Manual
    };
    finalize(store, attempt, exam, &user.username, trigger, now).await
}

/// Result lookup by public code, for the owner or an elevated user.
pub(crate) async fn lookup_result<S>(
    store: &S,
    user: &User,
    raw_code: &str,
) -> Result<AttemptResult, PortalError>
where
    S: PortalStore + ?Sized,
{
    let attempt = load_attempt(store, raw_code).await?;
    if attempt.user_id != user.id && !user.is_elevated() {
        return Err(PortalError::Forbidden("You do not have access to this result".to_string()));
    }

    let exam = load_exam(store, attempt.exam_id).await?;
    let username = if attempt.user_id == user.id {
        user.username.clone()
    } else {
        store
            .find_user_by_id(&attempt.user_id)
            .await?
            .map(|owner| owner.username)
            .unwrap_or_default()
    };

    Ok(build_result(attempt, exam, username))
}

async fn finalize<S>(
    store: &S,
    attempt: ExamAttempt,
    exam: Exam,
    username: &str,
    trigger: CompletionTrigger,
    now: PrimitiveDateTime,
) -> Result<AttemptResult, PortalError>
where
    S: PortalStore + ?Sized,
{
    let answers = store.list_answers(attempt.id).await?;
    let score = scoring::score(&answers);
    let percentage = scoring::percentage(score, attempt.total_marks);

    let won = store
        .complete_attempt(AttemptCompletion {
            attempt_id: attempt.id,
            score,
            percentage,
            end_time: now,
        })
        .await?;

    if !won {
        // Another request completed it first; report what it stored.
        let stored = load_attempt(store, &attempt.code).await?;
        return Ok(build_result(stored, exam, username.to_string()));
    }

    metrics::counter!(ATTEMPTS_COMPLETED_TOTAL, "trigger" => trigger.as_str()).increment(1);
    tracing::info!(
        attempt_code = %attempt.code,
        user_id = %attempt.user_id,
        exam_id = exam.id,
        trigger = trigger.as_str(),
        score,
        percentage,
        "Submitted exam attempt"
    );

    let completed = ExamAttempt {
        score,
        percentage,
        end_time: Some(now),
        is_completed: true,
        ..attempt
    };
    Ok(build_result(completed, exam, username.to_string()))
}

fn build_result(attempt: ExamAttempt, exam: Exam, username: String) -> AttemptResult {
    let passed = attempt.is_completed && scoring::passed(attempt.percentage, exam.pass_percentage);
    AttemptResult { attempt, exam, username, passed }
}

fn parse_selections(
    answers: &BTreeMap<i64, String>,
) -> Result<Vec<(i64, OptionLabel)>, PortalError> {
    answers
        .iter()
        .map(|(question_id, raw)| {
            OptionLabel::parse(raw).map(|label| (*question_id, label)).ok_or_else(|| {
                PortalError::validation(format!(
                    "Invalid answer '{raw}' for question {question_id}; expected A, B, C or D"
                ))
            })
        })
        .collect()
}

fn ensure_owner(attempt: &ExamAttempt, user: &User) -> Result<(), PortalError> {
    if attempt.user_id == user.id {
        Ok(())
    } else {
        Err(PortalError::Forbidden("You do not have access to this attempt".to_string()))
    }
}

async fn load_attempt<S>(store: &S, raw_code: &str) -> Result<ExamAttempt, PortalError>
where
    S: PortalStore + ?Sized,
{
    let code = normalize_code(raw_code);
    if !is_valid_attempt_code(&code) {
        return Err(PortalError::not_found("Attempt"));
    }

    store.find_attempt_by_code(&code).await?.ok_or_else(|| PortalError::not_found("Attempt"))
}

async fn load_exam<S>(store: &S, exam_id: i64) -> Result<Exam, PortalError>
where
    S: PortalStore + ?Sized,
{
    store.find_exam(exam_id).await?.ok_or_else(|| PortalError::not_found("Exam"))
}
