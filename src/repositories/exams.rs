use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Exam;
use crate::store::ExamFields;

pub(crate) const COLUMNS: &str = "\
    id, category_id, name, description, duration_minutes, number_of_questions, \
    start_date, end_date, pass_percentage, created_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!("SELECT {COLUMNS} FROM exams WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_by_category(
    pool: &PgPool,
    category_id: i64,
) -> Result<Vec<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "SELECT {COLUMNS} FROM exams WHERE category_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(category_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_active_by_category(
    pool: &PgPool,
    category_id: i64,
    now: PrimitiveDateTime,
) -> Result<Vec<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "SELECT {COLUMNS} FROM exams
         WHERE category_id = $1 AND start_date <= $2 AND end_date >= $2
         ORDER BY start_date, id"
    ))
    .bind(category_id)
    .bind(now)
    .fetch_all(pool)
    .await
}

pub(crate) async fn create(
    pool: &PgPool,
    category_id: i64,
    fields: &ExamFields,
    created_at: PrimitiveDateTime,
) -> Result<Exam, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "INSERT INTO exams (
            category_id, name, description, duration_minutes, number_of_questions,
            start_date, end_date, pass_percentage, created_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
        RETURNING {COLUMNS}"
    ))
    .bind(category_id)
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(fields.duration_minutes)
    .bind(fields.number_of_questions)
    .bind(fields.start_date)
    .bind(fields.end_date)
    .bind(fields.pass_percentage)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    id: i64,
    fields: &ExamFields,
) -> Result<Option<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "UPDATE exams SET
            name = $1,
            description = $2,
            duration_minutes = $3,
            number_of_questions = $4,
            start_date = $5,
            end_date = $6,
            pass_percentage = $7
         WHERE id = $8
         RETURNING {COLUMNS}"
    ))
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(fields.duration_minutes)
    .bind(fields.number_of_questions)
    .bind(fields.start_date)
    .bind(fields.end_date)
    .bind(fields.pass_percentage)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM exams WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM exams").fetch_one(pool).await
}
