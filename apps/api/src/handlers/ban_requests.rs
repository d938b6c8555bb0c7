use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use warden_application::SubmitBanRequestInput;
use warden_core::{AppError, StaffIdentity};
use warden_domain::BanRequestId;

use crate::dto::{
    ApprovalResponse, BanRequestResponse, ListBanRequestsQuery, SubmitBanRequestRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::{parse_optional_duration, parse_status_filter};

/// POST /api/ban-requests
pub async fn submit_ban_request_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<StaffIdentity>,
    Json(payload): Json<SubmitBanRequestRequest>,
) -> ApiResult<(StatusCode, Json<BanRequestResponse>)> {
    let duration = parse_optional_duration(Some(payload.duration.as_str()))?
        .ok_or_else(|| AppError::Validation("a ban request requires a duration".to_owned()))?;

    let request = state
        .ban_request_service
        .submit_request(
            &actor,
            SubmitBanRequestInput {
                target: payload.target,
                reason: payload.reason,
                evidence: payload.evidence,
                duration,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(request.into())))
}

/// GET /api/ban-requests
///
/// Reviewers see every request; everyone else sees the requests they filed.
pub async fn list_ban_requests_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<StaffIdentity>,
    Query(query): Query<ListBanRequestsQuery>,
) -> ApiResult<Json<Vec<BanRequestResponse>>> {
    let status = parse_status_filter(query.status.as_deref())?;
    let requests = state
        .ban_request_service
        .list_visible(&actor, status)
        .await?;

    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// POST /api/ban-requests/{id}/approve
pub async fn approve_ban_request_handler(
    State(state): State<AppState>,
    Extension(reviewer): Extension<StaffIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApprovalResponse>> {
    let outcome = state
        .review_service
        .approve(&reviewer, BanRequestId::new(id))
        .await?;

    Ok(Json(outcome.into()))
}

/// POST /api/ban-requests/{id}/deny
pub async fn deny_ban_request_handler(
    State(state): State<AppState>,
    Extension(reviewer): Extension<StaffIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<Json<BanRequestResponse>> {
    let request = state
        .review_service
        .deny(&reviewer, BanRequestId::new(id))
        .await?;

    Ok(Json(request.into()))
}
