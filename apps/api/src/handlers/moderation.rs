use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use warden_application::{CorrectEntryInput, SubmitActionInput};
use warden_core::StaffIdentity;
use warden_domain::AuditLogEntryId;

use crate::dto::{AuditLogEntryResponse, CorrectEntryRequest, ListLogsQuery, SubmitActionRequest};
use crate::error::ApiResult;
use crate::state::AppState;

use super::{parse_action_type, parse_optional_duration};

/// POST /api/actions
pub async fn submit_action_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<StaffIdentity>,
    Json(payload): Json<SubmitActionRequest>,
) -> ApiResult<(StatusCode, Json<AuditLogEntryResponse>)> {
    let input = SubmitActionInput {
        action_type: parse_action_type(&payload.action_type)?,
        target: payload.target,
        reason: payload.reason,
        evidence: payload.evidence,
        duration: parse_optional_duration(payload.duration.as_deref())?,
    };

    let entry = state.moderation_service.submit_action(&actor, input).await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// GET /api/logs
pub async fn list_logs_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<StaffIdentity>,
    Query(query): Query<ListLogsQuery>,
) -> ApiResult<Json<Vec<AuditLogEntryResponse>>> {
    let entries = state
        .moderation_service
        .list_entries(&actor, query.target.as_deref())
        .await?;

    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// DELETE /api/logs/{id}
pub async fn delete_log_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<StaffIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .moderation_service
        .delete_entry(&actor, AuditLogEntryId::new(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/logs/{id}
pub async fn correct_log_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<StaffIdentity>,
    Path(id): Path<i64>,
    Json(payload): Json<CorrectEntryRequest>,
) -> ApiResult<Json<AuditLogEntryResponse>> {
    let input = CorrectEntryInput {
        action_type: parse_action_type(&payload.action_type)?,
        reason: payload.reason,
        duration: parse_optional_duration(payload.duration.as_deref())?,
    };

    let entry = state
        .moderation_service
        .correct_entry(&actor, AuditLogEntryId::new(id), input)
        .await?;

    Ok(Json(entry.into()))
}
