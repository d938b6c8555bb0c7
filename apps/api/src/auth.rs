use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use tower_sessions::Session;
use tracing::info;
use warden_core::{AppError, StaffIdentity};

use crate::dto::{LoginRequest, StaffIdentityResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Session key holding the authenticated [`StaffIdentity`].
pub const SESSION_STAFF_KEY: &str = "staff_identity";

/// POST /auth/login
pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<StaffIdentityResponse>> {
    let identity = state
        .staff_service
        .authenticate(&payload.username, &payload.password)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("invalid username or password".to_owned()))?;

    // Fresh session id on every privilege change.
    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_STAFF_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    Ok(Json(identity.into()))
}

/// POST /auth/logout
pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    let identity = session
        .get::<StaffIdentity>(SESSION_STAFF_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?;

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    if let Some(identity) = identity {
        info!(username = %identity.username(), "staff logout");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me
pub async fn me_handler(
    Extension(identity): Extension<StaffIdentity>,
) -> Json<StaffIdentityResponse> {
    Json(identity.into())
}
