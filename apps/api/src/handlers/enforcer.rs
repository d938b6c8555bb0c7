use axum::Json;
use axum::extract::{Path, Query, State};
use warden_domain::AuditLogEntryId;

use crate::dto::{AuditLogEntryResponse, PendingEntriesQuery};
use crate::error::ApiResult;
use crate::state::AppState;

const DEFAULT_BATCH_SIZE: usize = 25;

/// GET /api/internal/enforcer/pending
pub async fn pending_entries_handler(
    State(state): State<AppState>,
    Query(query): Query<PendingEntriesQuery>,
) -> ApiResult<Json<Vec<AuditLogEntryResponse>>> {
    let entries = state
        .enforcement_service
        .pending_entries(query.limit.unwrap_or(DEFAULT_BATCH_SIZE))
        .await?;

    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// POST /api/internal/enforcer/logs/{id}/handled
pub async fn mark_handled_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<AuditLogEntryResponse>> {
    let entry = state
        .enforcement_service
        .mark_handled(AuditLogEntryId::new(id))
        .await?;

    Ok(Json(entry.into()))
}
