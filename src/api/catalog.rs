use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::schemas::category::{CatalogCategoryResponse, CategoryResponse};
use crate::schemas::exam::ExamResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories))
        .route("/:category_id", get(get_category))
}

async fn list_categories(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = state
        .store()
        .list_categories()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list categories"))?;

    Ok(Json(categories.into_iter().map(CategoryResponse::from_db).collect()))
}

async fn get_category(
    Path(category_id): Path<i64>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<CatalogCategoryResponse>, ApiError> {
    let store = state.store();
    let category = store
        .find_category(category_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch category"))?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    let now = primitive_now_utc();
    let exams = store
        .list_active_exams(category.id, now)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list exams"))?;

    let exam_ids: Vec<i64> = exams.iter().map(|exam| exam.id).collect();
    let completed_exam_ids = store
        .completed_exam_ids(&user.id, &exam_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load completed exams"))?;

    Ok(Json(CatalogCategoryResponse {
        category: CategoryResponse::from_db(category),
        exams: exams.into_iter().map(|exam| ExamResponse::from_db(exam, now)).collect(),
        completed_exam_ids,
    }))
}
