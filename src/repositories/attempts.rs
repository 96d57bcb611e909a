use sqlx::types::Json;
use sqlx::PgPool;

use crate::db::models::{AttemptListRow, ExamAttempt};
use crate::db::types::UserRole;
use crate::store::{AttemptCompletion, NewAttempt};

pub(crate) const COLUMNS: &str = "\
    id, code, user_id, exam_id, start_time, end_time, score, total_marks, \
    percentage, is_completed, question_ids";

pub(crate) async fn find_by_code(
    pool: &PgPool,
    code: &str,
) -> Result<Option<ExamAttempt>, sqlx::Error> {
    sqlx::query_as::<_, ExamAttempt>(&format!(
        "SELECT {COLUMNS} FROM exam_attempts WHERE code = $1"
    ))
    .bind(code)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_for_user(
    pool: &PgPool,
    user_id: &str,
    exam_id: i64,
    completed: bool,
) -> Result<Option<ExamAttempt>, sqlx::Error> {
    sqlx::query_as::<_, ExamAttempt>(&format!(
        "SELECT {COLUMNS} FROM exam_attempts
         WHERE user_id = $1 AND exam_id = $2 AND is_completed = $3
         ORDER BY start_time DESC, id DESC
         LIMIT 1"
    ))
    .bind(user_id)
    .bind(exam_id)
    .bind(completed)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn code_exists(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM exam_attempts WHERE code = $1)")
        .bind(code)
        .fetch_one(pool)
        .await
}

/// Returns `None` when another attempt already holds the code.
pub(crate) async fn create(
    pool: &PgPool,
    params: NewAttempt,
) -> Result<Option<ExamAttempt>, sqlx::Error> {
    sqlx::query_as::<_, ExamAttempt>(&format!(
        "INSERT INTO exam_attempts (
            code, user_id, exam_id, start_time, end_time, score, total_marks,
            percentage, is_completed, question_ids
        ) VALUES ($1,$2,$3,$4,NULL,0,$5,0,FALSE,$6)
        ON CONFLICT (code) DO NOTHING
        RETURNING {COLUMNS}"
    ))
    .bind(params.code)
    .bind(params.user_id)
    .bind(params.exam_id)
    .bind(params.start_time)
    .bind(params.total_marks)
    .bind(Json(params.question_ids))
    .fetch_optional(pool)
    .await
}

pub(crate) async fn complete(
    pool: &PgPool,
    completion: AttemptCompletion,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE exam_attempts SET
            score = $1,
            percentage = $2,
            end_time = $3,
            is_completed = TRUE
         WHERE id = $4 AND is_completed = FALSE",
    )
    .bind(completion.score)
    .bind(completion.percentage)
    .bind(completion.end_time)
    .bind(completion.attempt_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub(crate) async fn completed_exam_ids(
    pool: &PgPool,
    user_id: &str,
    exam_ids: &[i64],
) -> Result<Vec<i64>, sqlx::Error> {
    if exam_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_scalar(
        "SELECT DISTINCT exam_id FROM exam_attempts
         WHERE user_id = $1 AND is_completed = TRUE AND exam_id = ANY($2)
         ORDER BY exam_id",
    )
    .bind(user_id)
    .bind(exam_ids)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_with_names(
    pool: &PgPool,
    exclude_superusers: bool,
    skip: i64,
    limit: i64,
) -> Result<Vec<AttemptListRow>, sqlx::Error> {
    sqlx::query_as::<_, AttemptListRow>(
        "SELECT a.id, a.code, u.username, a.exam_id, e.name AS exam_name,
                a.start_time, a.end_time, a.score, a.total_marks, a.percentage, a.is_completed
         FROM exam_attempts a
         JOIN users u ON u.id = a.user_id
         JOIN exams e ON e.id = a.exam_id
         WHERE NOT ($1 AND u.role = $2)
         ORDER BY a.start_time DESC, a.id DESC
         OFFSET $3 LIMIT $4",
    )
    .bind(exclude_superusers)
    .bind(UserRole::Superuser)
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count(pool: &PgPool, exclude_superusers: bool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM exam_attempts a
         JOIN users u ON u.id = a.user_id
         WHERE NOT ($1 AND u.role = $2)",
    )
    .bind(exclude_superusers)
    .bind(UserRole::Superuser)
    .fetch_one(pool)
    .await
}
