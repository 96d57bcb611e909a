use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::schemas::attempt::{
    AnswersPayload, AttemptResultResponse, AttemptStateResponse, StartAttemptResponse,
};
use crate::services::attempts;

pub(super) async fn start_attempt(
    Path(exam_id): Path<i64>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<StartAttemptResponse>), ApiError> {
    let outcome = attempts::start_attempt(state.store(), &user, exam_id, primitive_now_utc()).await?;
    let status = if outcome.resumed { StatusCode::OK } else { StatusCode::CREATED };
    Ok((status, Json(StartAttemptResponse::from_outcome(outcome))))
}

pub(super) async fn get_attempt(
    Path(code): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<AttemptStateResponse>, ApiError> {
    let outcome = attempts::take_attempt(
        state.store(),
        &user,
        &code,
        &BTreeMap::new(),
        false,
        primitive_now_utc(),
    )
    .await?;
    Ok(Json(AttemptStateResponse::from_outcome(outcome, state.settings().media())))
}

pub(super) async fn record_answers(
    Path(code): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<AnswersPayload>,
) -> Result<Json<AttemptStateResponse>, ApiError> {
    let outcome = attempts::take_attempt(
        state.store(),
        &user,
        &code,
        &payload.answers,
        payload.submit,
        primitive_now_utc(),
    )
    .await?;
    Ok(Json(AttemptStateResponse::from_outcome(outcome, state.settings().media())))
}

pub(super) async fn submit_attempt(
    Path(code): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<AttemptResultResponse>, ApiError> {
    let result = attempts::submit_attempt(state.store(), &user, &code, primitive_now_utc()).await?;
    Ok(Json(AttemptResultResponse::from_result(result)))
}

pub(super) async fn get_result(
    Path(code): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<AttemptResultResponse>, ApiError> {
    let result = attempts::lookup_result(state.store(), &user, &code).await?;
    Ok(Json(AttemptResultResponse::from_result(result)))
}
