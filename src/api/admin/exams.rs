use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::schemas::exam::{ExamDetailResponse, ExamPayload, ExamResponse};
use crate::schemas::question::QuestionResponse;
use crate::services::content_rules;
use crate::store::ExamFields;

fn exam_fields(state: &AppState, payload: ExamPayload) -> Result<ExamFields, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let exam_settings = state.settings().exam();
    let fields = payload.into_fields(exam_settings.default_pass_percentage);
    content_rules::validate_exam(&fields, exam_settings.max_questions_per_exam)?;
    Ok(fields)
}

pub(super) async fn create_exam(
    Path(category_id): Path<i64>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<ExamPayload>,
) -> Result<(StatusCode, Json<ExamResponse>), ApiError> {
    let fields = exam_fields(&state, payload)?;
    let store = state.store();

    store
        .find_category(category_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch category"))?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    let now = primitive_now_utc();
    let exam = store
        .create_exam(category_id, fields, now)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create exam"))?;

    tracing::info!(exam_id = exam.id, category_id, admin_id = %admin.id, "Created exam");

    Ok((StatusCode::CREATED, Json(ExamResponse::from_db(exam, now))))
}

pub(super) async fn get_exam(
    Path(exam_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<ExamDetailResponse>, ApiError> {
    let store = state.store();
    let exam = store
        .find_exam(exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch exam"))?
        .ok_or_else(|| ApiError::NotFound("Exam not found".to_string()))?;

    let questions = store
        .list_questions(exam.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list questions"))?;

    let media = state.settings().media();
    Ok(Json(ExamDetailResponse {
        exam: ExamResponse::from_db(exam, primitive_now_utc()),
        questions: questions
            .into_iter()
            .map(|question| QuestionResponse::from_db(question, media))
            .collect(),
    }))
}

pub(super) async fn update_exam(
    Path(exam_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<ExamPayload>,
) -> Result<Json<ExamResponse>, ApiError> {
    let fields = exam_fields(&state, payload)?;

    let exam = state
        .store()
        .update_exam(exam_id, fields)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update exam"))?
        .ok_or_else(|| ApiError::NotFound("Exam not found".to_string()))?;

    Ok(Json(ExamResponse::from_db(exam, primitive_now_utc())))
}

pub(super) async fn delete_exam(
    Path(exam_id): Path<i64>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .store()
        .delete_exam(exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete exam"))?;

    if !deleted {
        return Err(ApiError::NotFound("Exam not found".to_string()));
    }

    tracing::info!(exam_id, admin_id = %admin.id, "Deleted exam");
    Ok(StatusCode::NO_CONTENT)
}
