/**
 * Contact Route
 * Stores an inquiry, then relays it to the agency inbox
 */
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApiError, ApiJson};
use crate::content::{ContactDraft, ContactStatus};
use crate::mail;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub service: Option<String>,
    pub budget: Option<String>,
    pub message: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
    pub id: Uuid,
    /// False when the relay is disabled or failed; the submission is kept either way.
    pub delivered: bool,
}

/// POST /api/contact
pub async fn submit_contact(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    let submission = state
        .content
        .contacts
        .create(ContactDraft {
            name: payload.name,
            email: payload.email,
            company: payload.company,
            service: payload.service,
            budget: payload.budget,
            message: payload.message,
            status: ContactStatus::New,
        })
        .await?;

    tracing::info!(id = %submission.id, "Contact submission stored");

    let delivered = if state.mailer.is_enabled() {
        let email = mail::contact_notification(&submission, &state.config.mail);
        match state.mailer.send(&email).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(id = %submission.id, "Failed to relay contact submission: {}", e);
                false
            }
        }
    } else {
        false
    };

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            success: true,
            id: submission.id,
            delivered,
        }),
    ))
}
