use sqlx::PgPool;

use crate::db::models::Answer;
use crate::store::AnswerUpsert;

pub(crate) const COLUMNS: &str =
    "id, attempt_id, question_id, selected_answer, is_correct, marks_obtained, updated_at";

/// Last write wins on `(attempt_id, question_id)`. Nothing is written once the
/// attempt is completed.
pub(crate) async fn upsert(
    pool: &PgPool,
    params: AnswerUpsert,
) -> Result<Option<Answer>, sqlx::Error> {
    sqlx::query_as::<_, Answer>(&format!(
        "INSERT INTO answers (
            attempt_id, question_id, selected_answer, is_correct, marks_obtained, updated_at
        )
        SELECT $1,$2,$3,$4,$5,$6
        WHERE EXISTS (
            SELECT 1 FROM exam_attempts WHERE id = $1 AND is_completed = FALSE
        )
        ON CONFLICT (attempt_id, question_id) DO UPDATE SET
            selected_answer = EXCLUDED.selected_answer,
            is_correct = EXCLUDED.is_correct,
            marks_obtained = EXCLUDED.marks_obtained,
            updated_at = EXCLUDED.updated_at
        RETURNING {COLUMNS}"
    ))
    .bind(params.attempt_id)
    .bind(params.question_id)
    .bind(params.selected_answer)
    .bind(params.is_correct)
    .bind(params.marks_obtained)
    .bind(params.updated_at)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_attempt(
    pool: &PgPool,
    attempt_id: i64,
) -> Result<Vec<Answer>, sqlx::Error> {
    sqlx::query_as::<_, Answer>(&format!(
        "SELECT {COLUMNS} FROM answers WHERE attempt_id = $1 ORDER BY question_id"
    ))
    .bind(attempt_id)
    .fetch_all(pool)
    .await
}
