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
use crate::schemas::question::{QuestionPayload, QuestionResponse};
use crate::store::QuestionFields;

fn question_fields(state: &AppState, payload: QuestionPayload) -> Result<QuestionFields, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(payload.into_fields(&state.settings().media().allowed_image_extensions)?)
}

pub(super) async fn create_question(
    Path(exam_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<QuestionPayload>,
) -> Result<(StatusCode, Json<QuestionResponse>), ApiError> {
    let fields = question_fields(&state, payload)?;
    let store = state.store();

    store
        .find_exam(exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch exam"))?
        .ok_or_else(|| ApiError::NotFound("Exam not found".to_string()))?;

    let question = store
        .create_question(exam_id, fields, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create question"))?;

    Ok((StatusCode::CREATED, Json(QuestionResponse::from_db(question, state.settings().media()))))
}

pub(super) async fn get_question(
    Path(question_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let question = state
        .store()
        .find_question(question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question"))?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    Ok(Json(QuestionResponse::from_db(question, state.settings().media())))
}

pub(super) async fn update_question(
    Path(question_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<QuestionPayload>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let fields = question_fields(&state, payload)?;

    let question = state
        .store()
        .update_question(question_id, fields)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update question"))?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    Ok(Json(QuestionResponse::from_db(question, state.settings().media())))
}

pub(super) async fn delete_question(
    Path(question_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .store()
        .delete_question(question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete question"))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Question not found".to_string()))
    }
}
