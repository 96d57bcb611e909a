use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Question;
use crate::store::QuestionFields;

pub(crate) const COLUMNS: &str = "\
    id, exam_id, question_text, option_kind, option_a, option_b, option_c, option_d, \
    option_a_image, option_b_image, option_c_image, option_d_image, \
    correct_answer, marks, created_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!("SELECT {COLUMNS} FROM questions WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_by_exam(pool: &PgPool, exam_id: i64) -> Result<Vec<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {COLUMNS} FROM questions WHERE exam_id = $1 ORDER BY id"
    ))
    .bind(exam_id)
    .fetch_all(pool)
    .await
}

/// Keeps the order of `ids`, which is the frozen order of an attempt.
pub(crate) async fn list_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<Question>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, Question>(&format!(
        "SELECT {COLUMNS} FROM questions
         WHERE id = ANY($1)
         ORDER BY array_position($1, id)"
    ))
    .bind(ids)
    .fetch_all(pool)
    .await
}

pub(crate) async fn create(
    pool: &PgPool,
    exam_id: i64,
    fields: QuestionFields,
    created_at: PrimitiveDateTime,
) -> Result<Question, sqlx::Error> {
    let option_kind = fields.options.kind();
    let ([a, b, c, d], [a_image, b_image, c_image, d_image]) = fields.options.into_columns();

    sqlx::query_as::<_, Question>(&format!(
        "INSERT INTO questions (
            exam_id, question_text, option_kind, option_a, option_b, option_c, option_d,
            option_a_image, option_b_image, option_c_image, option_d_image,
            correct_answer, marks, created_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14)
        RETURNING {COLUMNS}"
    ))
    .bind(exam_id)
    .bind(fields.question_text)
    .bind(option_kind)
    .bind(a)
    .bind(b)
    .bind(c)
    .bind(d)
    .bind(a_image)
    .bind(b_image)
    .bind(c_image)
    .bind(d_image)
    .bind(fields.correct_answer)
    .bind(fields.marks)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    id: i64,
    fields: QuestionFields,
) -> Result<Option<Question>, sqlx::Error> {
    let option_kind = fields.options.kind();
    let ([a, b, c, d], [a_image, b_image, c_image, d_image]) = fields.options.into_columns();

    sqlx::query_as::<_, Question>(&format!(
        "UPDATE questions SET
            question_text = $1,
            option_kind = $2,
            option_a = $3,
            option_b = $4,
            option_c = $5,
            option_d = $6,
            option_a_image = $7,
            option_b_image = $8,
            option_c_image = $9,
            option_d_image = $10,
            correct_answer = $11,
            marks = $12
         WHERE id = $13
         RETURNING {COLUMNS}"
    ))
    .bind(fields.question_text)
    .bind(option_kind)
    .bind(a)
    .bind(b)
    .bind(c)
    .bind(d)
    .bind(a_image)
    .bind(b_image)
    .bind(c_image)
    .bind(d_image)
    .bind(fields.correct_answer)
    .bind(fields.marks)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
