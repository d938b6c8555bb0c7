use serde::{Deserialize, Serialize};
use ts_rs::TS;
use warden_application::ApprovalOutcome;
use warden_domain::BanRequest;

use super::AuditLogEntryResponse;

/// Incoming payload for filing a ban request.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/submit-ban-request-request.ts"
)]
pub struct SubmitBanRequestRequest {
    pub target: String,
    pub reason: String,
    pub evidence: Vec<String>,
    pub duration: String,
}

/// Query string for the ban request listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListBanRequestsQuery {
    /// `pending`, `approved` or `denied`.
    pub status: Option<String>,
}

/// API representation of a ban request.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/ban-request-response.ts"
)]
pub struct BanRequestResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub target: String,
    pub reason: String,
    pub evidence: Vec<String>,
    pub duration: String,
    pub requested_by: String,
    pub status: String,
    pub reviewed_by: Option<String>,
    pub created_at: String,
    pub reviewed_at: Option<String>,
}

impl From<BanRequest> for BanRequestResponse {
    fn from(request: BanRequest) -> Self {
        Self {
            id: request.id().as_i64(),
            target: request.target().to_owned(),
            reason: request.reason().to_owned(),
            evidence: request.evidence().clone().into(),
            duration: request.duration().label().to_owned(),
            requested_by: request.requested_by().to_owned(),
            status: request.status().as_str().to_owned(),
            reviewed_by: request.reviewed_by().map(ToOwned::to_owned),
            created_at: request.created_at().to_rfc3339(),
            reviewed_at: request.reviewed_at().map(|reviewed_at| reviewed_at.to_rfc3339()),
        }
    }
}

/// Result of approving a ban request.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/approval-response.ts"
)]
pub struct ApprovalResponse {
    pub request: BanRequestResponse,
    pub entry: AuditLogEntryResponse,
}

impl From<ApprovalOutcome> for ApprovalResponse {
    fn from(outcome: ApprovalOutcome) -> Self {
        Self {
            request: outcome.request.into(),
            entry: outcome.entry.into(),
        }
    }
}
