mod handlers;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::state::AppState;

/// Taker-facing attempt routes. Attempts are always addressed by their public code.
pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/exams/:exam_id/start", post(handlers::start_attempt))
        .route("/attempts/:code", get(handlers::get_attempt))
        .route("/attempts/:code/answers", post(handlers::record_answers))
        .route("/attempts/:code/submit", post(handlers::submit_attempt))
        .route("/results/:code", get(handlers::get_result))
}
