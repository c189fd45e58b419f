//! Axum route handler for candidate notifications.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::notify::templates::DEFAULT_CANDIDATE_NAME;
use crate::notify::{Decision, NotifierMode};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    pub email: Option<String>,
    pub status: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotifyResponse {
    pub success: bool,
    pub message: String,
    pub mode: NotifierMode,
}

/// POST /api/v1/notifications
///
/// Sends the accept/reject email for a candidate.
pub async fn handle_notify(
    State(state): State<AppState>,
    Json(request): Json<NotifyRequest>,
) -> Result<Json<NotifyResponse>, AppError> {
    let email = request
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Validation("No email found for this candidate.".to_string()))?;

    let decision = request
        .status
        .as_deref()
        .unwrap_or_default()
        .parse::<Decision>()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let name = request.name.as_deref().unwrap_or(DEFAULT_CANDIDATE_NAME);

    let message = state.notifier.notify(email, name, decision).await?;

    Ok(Json(NotifyResponse {
        success: true,
        message,
        mode: state.notifier.mode(),
    }))
}
