use std::sync::Arc;

use sqlx::PgPool;
use warden_application::{
    BanRequestService, EnforcementService, ModerationService, ReviewService, StaffService,
};
use warden_infrastructure::{
    Argon2PasswordHasher, PostgresAuditLogRepository, PostgresBanRequestRepository,
    PostgresStaffAccountRepository,
};

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_staff_service(pool: &PgPool) -> StaffService {
    StaffService::new(
        Arc::new(PostgresStaffAccountRepository::new(pool.clone())),
        Arc::new(Argon2PasswordHasher::new()),
    )
}

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let audit_log = Arc::new(PostgresAuditLogRepository::new(pool.clone()));
    let ban_requests = Arc::new(PostgresBanRequestRepository::new(pool.clone()));

    AppState {
        moderation_service: ModerationService::new(audit_log.clone()),
        ban_request_service: BanRequestService::new(ban_requests.clone()),
        review_service: ReviewService::new(ban_requests, audit_log.clone()),
        staff_service: build_staff_service(&pool),
        enforcement_service: EnforcementService::new(audit_log),
        postgres_pool: Some(pool),
        frontend_url: config.frontend_url.clone(),
        enforcer_shared_secret: config.enforcer_shared_secret.clone(),
    }
}
