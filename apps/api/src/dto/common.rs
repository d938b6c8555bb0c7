use serde::{Deserialize, Serialize};
use ts_rs::TS;
use warden_core::StaffIdentity;

/// Dependency probe result.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-dependency-status.ts"
)]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    pub detail: Option<String>,
}

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub postgres: HealthDependencyStatus,
}

/// Login form payload.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Authenticated staff member as seen by the dashboard client.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/staff-identity-response.ts"
)]
pub struct StaffIdentityResponse {
    pub username: String,
    /// Permission level 1..=3.
    pub role: u8,
}

impl From<StaffIdentity> for StaffIdentityResponse {
    fn from(identity: StaffIdentity) -> Self {
        Self {
            username: identity.username().to_owned(),
            role: identity.role().level(),
        }
    }
}

/// Query string for the enforcement batch endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PendingEntriesQuery {
    pub limit: Option<usize>,
}
