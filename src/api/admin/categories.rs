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
use crate::schemas::category::{AdminCategoryDetailResponse, CategoryPayload, CategoryResponse};
use crate::schemas::exam::ExamResponse;

pub(super) async fn list_categories(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = state
        .store()
        .list_categories()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list categories"))?;

    Ok(Json(categories.into_iter().map(CategoryResponse::from_db).collect()))
}

pub(super) async fn create_category(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let category = state
        .store()
        .create_category(payload.into_fields(), primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create category"))?;

    tracing::info!(category_id = category.id, admin_id = %admin.id, "Created category");

    Ok((StatusCode::CREATED, Json(CategoryResponse::from_db(category))))
}

pub(super) async fn get_category(
    Path(category_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<AdminCategoryDetailResponse>, ApiError> {
    let store = state.store();
    let category = store
        .find_category(category_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch category"))?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    let exams = store
        .list_exams(category.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list exams"))?;

    let now = primitive_now_utc();
    Ok(Json(AdminCategoryDetailResponse {
        category: CategoryResponse::from_db(category),
        exams: exams.into_iter().map(|exam| ExamResponse::from_db(exam, now)).collect(),
    }))
}

pub(super) async fn update_category(
    Path(category_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<CategoryResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let category = state
        .store()
        .update_category(category_id, payload.into_fields())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update category"))?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    Ok(Json(CategoryResponse::from_db(category)))
}

pub(super) async fn delete_category(
    Path(category_id): Path<i64>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .store()
        .delete_category(category_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete category"))?;

    if !deleted {
        return Err(ApiError::NotFound("Category not found".to_string()));
    }

    tracing::info!(category_id, admin_id = %admin.id, "Deleted category with its exams");
    Ok(StatusCode::NO_CONTENT)
}
