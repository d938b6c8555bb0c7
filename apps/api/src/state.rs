use sqlx::PgPool;
use warden_application::{
    BanRequestService, EnforcementService, ModerationService, ReviewService, StaffService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub moderation_service: ModerationService,
    pub ban_request_service: BanRequestService,
    pub review_service: ReviewService,
    pub staff_service: StaffService,
    pub enforcement_service: EnforcementService,
    /// Probed by `/health`; absent when running on in-memory stores.
    pub postgres_pool: Option<PgPool>,
    pub frontend_url: String,
    pub enforcer_shared_secret: String,
}
