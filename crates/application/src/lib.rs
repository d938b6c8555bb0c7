//! Application services and ports.

#![forbid(unsafe_code)]

mod ban_request_service;
mod enforcement_service;
mod moderation_ports;
mod moderation_service;
mod review_service;
mod staff_ports;
mod staff_service;

#[cfg(test)]
mod test_support;

pub use ban_request_service::{BanRequestService, SubmitBanRequestInput};
pub use enforcement_service::{EnforcementService, MAX_ENFORCEMENT_BATCH};
pub use moderation_ports::{AuditLogRepository, BanRequestRepository};
pub use moderation_service::{CorrectEntryInput, ModerationService, SubmitActionInput};
pub use review_service::{ApprovalOutcome, ReviewService};
pub use staff_ports::{PasswordHasher, StaffAccount, StaffAccountRepository};
pub use staff_service::StaffService;
