/**
 * Public Content Routes
 * Read-only views over published/public records
 */
use axum::{extract::State, Json};

use super::{ApiError, ApiPath, ApiQuery};
use crate::content::{Entity, ListQuery};
use crate::repo::Stored;
use crate::slug::is_valid_slug;
use crate::state::AppState;

/// GET /api/{collection} - public records, filtered and in display order
pub async fn list_public<T: Stored>(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<T>>, ApiError> {
    let items: Vec<T> = state
        .content
        .repo::<T>()
        .get_all()
        .await?
        .into_iter()
        .filter(Entity::is_public)
        .collect();

    Ok(Json(query.apply(items)))
}

/// GET /api/{collection}/{slug} - one public record by slug
pub async fn show_public<T: Stored>(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<T>, ApiError> {
    if !is_valid_slug(&slug) {
        return Err(ApiError::invalid_slug());
    }

    match state.content.repo::<T>().get_by_slug(&slug).await? {
        Some(item) if item.is_public() => Ok(Json(item)),
        _ => Err(ApiError::not_found()),
    }
}
