mod ban_requests;
mod common;
mod moderation;

pub use ban_requests::{
    ApprovalResponse, BanRequestResponse, ListBanRequestsQuery, SubmitBanRequestRequest,
};
pub use common::{
    HealthDependencyStatus, HealthResponse, LoginRequest, PendingEntriesQuery,
    StaffIdentityResponse,
};
pub use moderation::{
    AuditLogEntryResponse, CorrectEntryRequest, ListLogsQuery, SubmitActionRequest,
};
