use axum::{
    extract::{Query, State},
    Json,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::pagination::{PageQuery, PaginatedResponse};
use crate::core::state::AppState;
use crate::schemas::attempt::AttemptListItem;

/// Attempts by superusers are left out of the listing.
pub(super) async fn list_attempts(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<AttemptListItem>>, ApiError> {
    let (skip, limit) = page.normalized();
    let store = state.store();

    let rows = store
        .list_attempts(true, skip, limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list attempts"))?;
    let total_count = store
        .count_attempts(true)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count attempts"))?;

    Ok(Json(PaginatedResponse {
        items: rows.into_iter().map(AttemptListItem::from_row).collect(),
        total_count,
        skip,
        limit,
    }))
}
