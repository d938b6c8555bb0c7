//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit_log;
mod ban_request;
mod evidence;
mod moderation;
pub mod policy;
mod staff;

pub use audit_log::{
    AuditLogCorrection, AuditLogEntry, AuditLogEntryId, NewAuditLogEntry, newest_first,
};
pub use ban_request::{
    BanRequest, BanRequestId, BanRequestReview, BanRequestStatus, NewBanRequest,
    newest_request_first,
};
pub use evidence::{EVIDENCE_COUNT, Evidence, validate_evidence};
pub use moderation::{ActionType, BanDuration, ModerationAction};
pub use policy::SubmissionRoute;
pub use staff::{
    PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, USERNAME_MAX_LENGTH, normalize_username,
    validate_password,
};
