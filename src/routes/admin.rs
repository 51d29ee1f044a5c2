/**
 * Admin Routes
 * Password-gated CRUD over every content collection
 */
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApiError, ApiJson, ApiPath, ApiQuery, SuccessResponse};
use crate::content::{
    BlogPost, ContactDraft, ContactStatus, ContactSubmission, ListQuery, PortfolioItem, Service,
    TeamMember, Testimonial,
};
use crate::repo::{RepoError, Stored};
use crate::state::AppState;

/// Body of `PATCH /contacts/{id}/status`.
#[derive(Debug, Deserialize, Serialize)]
pub struct StatusUpdate {
    pub status: ContactStatus,
}

/// Admin router, mounted under `/api/admin`.
pub fn router(state: AppState) -> Router<AppState> {
    let router = Router::new().route("/verify", get(verify));
    let router = collection::<TeamMember>(router);
    let router = collection::<Service>(router);
    let router = collection::<PortfolioItem>(router);
    let router = collection::<BlogPost>(router);
    let router = collection::<Testimonial>(router);
    let router = collection::<ContactSubmission>(router);

    router
        .route("/contacts/{id}/status", patch(update_contact_status))
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

fn collection<T: Stored>(router: Router<AppState>) -> Router<AppState> {
    let base = format!("/{}", T::COLLECTION);
    router
        .route(&base, get(list::<T>).post(create::<T>))
        .route(
            &format!("{}/{{id}}", base),
            get(fetch::<T>).put(update::<T>).delete(remove::<T>),
        )
}

// ============================================================================
// Access gate
// ============================================================================

/// Extract bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(hash) = state.config.admin_password_hash.clone() else {
        tracing::warn!("Admin request rejected: no admin password configured");
        return ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Admin access not configured")
            .into_response();
    };

    let Some(password) = extract_bearer_token(request.headers()) else {
        return ApiError::new(StatusCode::UNAUTHORIZED, "Authorization required").into_response();
    };

    // bcrypt blocks; keep it off the async workers
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await;

    match verified {
        Ok(Ok(true)) => next.run(request).await,
        Ok(Ok(false)) => {
            tracing::warn!(uri = %request.uri(), "Admin request with invalid password");
            ApiError::new(StatusCode::UNAUTHORIZED, "Invalid admin password").into_response()
        }
        Ok(Err(e)) => {
            tracing::error!("Admin password hash is unusable: {}", e);
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Admin access misconfigured")
                .into_response()
        }
        Err(e) => {
            tracing::error!("Password verification task failed: {}", e);
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                .into_response()
        }
    }
}

/// GET /api/admin/verify - succeeds only past the gate
pub async fn verify() -> Json<SuccessResponse> {
    Json(SuccessResponse { success: true })
}

// ============================================================================
// Collection handlers
// ============================================================================

/// GET /api/admin/{collection} - every record, drafts included
pub async fn list<T: Stored>(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<T>>, ApiError> {
    let items = state.content.repo::<T>().get_all().await?;
    Ok(Json(query.apply(items)))
}

pub async fn fetch<T: Stored>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<T>, ApiError> {
    state
        .content
        .repo::<T>()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

pub async fn create<T: Stored>(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<T::Draft>,
) -> Result<(StatusCode, Json<T>), ApiError> {
    let created = state.content.repo::<T>().create(draft).await?;
    tracing::info!(collection = T::COLLECTION, id = %created.id(), "Record created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update<T: Stored>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(draft): ApiJson<T::Draft>,
) -> Result<Json<T>, ApiError> {
    let updated = state.content.repo::<T>().update(id, draft).await?;
    tracing::info!(collection = T::COLLECTION, %id, "Record updated");
    Ok(Json(updated))
}

pub async fn remove<T: Stored>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.content.repo::<T>().delete(id).await?;
    tracing::info!(collection = T::COLLECTION, %id, "Record deleted");
    Ok(Json(SuccessResponse { success: true }))
}

/// PATCH /api/admin/contacts/{id}/status
pub async fn update_contact_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<StatusUpdate>,
) -> Result<Json<ContactSubmission>, ApiError> {
    let existing = state
        .content
        .contacts
        .get_by_id(id)
        .await?
        .ok_or(RepoError::NotFound)?;

    let mut draft = ContactDraft::from(existing);
    draft.status = payload.status;

    let updated = state.content.contacts.update(id, draft).await?;
    tracing::info!(%id, status = %updated.status, "Contact status updated");
    Ok(Json(updated))
}
