mod attempts;
mod categories;
mod exams;
mod questions;

use axum::{extract::State, routing::get, Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::core::state::AppState;
use crate::schemas::DashboardResponse;

/// Content administration; every route requires an admin or superuser.
pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/categories", get(categories::list_categories).post(categories::create_category))
        .route(
            "/categories/:category_id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/categories/:category_id/exams", axum::routing::post(exams::create_exam))
        .route(
            "/exams/:exam_id",
            get(exams::get_exam).put(exams::update_exam).delete(exams::delete_exam),
        )
        .route("/exams/:exam_id/questions", axum::routing::post(questions::create_question))
        .route(
            "/questions/:question_id",
            get(questions::get_question)
                .put(questions::update_question)
                .delete(questions::delete_question),
        )
        .route("/attempts", get(attempts::list_attempts))
}

async fn dashboard(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let counts = state
        .store()
        .dashboard_counts()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load dashboard counts"))?;

    Ok(Json(DashboardResponse {
        categories: counts.categories,
        exams: counts.exams,
        attempts: counts.attempts,
    }))
}
