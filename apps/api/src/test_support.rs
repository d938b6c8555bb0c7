//! In-memory application state shared by the API tests.

use std::sync::Arc;

use warden_application::{
    BanRequestService, EnforcementService, ModerationService, ReviewService, StaffService,
};
use warden_core::AppResult;
use warden_infrastructure::{
    Argon2PasswordHasher, InMemoryAuditLogRepository, InMemoryBanRequestRepository,
    InMemoryStaffAccountRepository,
};

use crate::state::AppState;

pub(crate) const FRONTEND_URL: &str = "http://localhost:3000";
pub(crate) const ENFORCER_SECRET: &str = "enforcer-secret";

pub(crate) fn in_memory_state() -> AppResult<AppState> {
    let audit_log = Arc::new(InMemoryAuditLogRepository::new());
    let requests = Arc::new(InMemoryBanRequestRepository::new());
    let hasher = Arc::new(Argon2PasswordHasher::with_cost(1_024, 1)?);

    Ok(AppState {
        moderation_service: ModerationService::new(audit_log.clone()),
        ban_request_service: BanRequestService::new(requests.clone()),
        review_service: ReviewService::new(requests, audit_log.clone()),
        staff_service: StaffService::new(Arc::new(InMemoryStaffAccountRepository::new()), hasher),
        enforcement_service: EnforcementService::new(audit_log),
        postgres_pool: None,
        frontend_url: FRONTEND_URL.to_owned(),
        enforcer_shared_secret: ENFORCER_SECRET.to_owned(),
    })
}
