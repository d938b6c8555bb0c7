//! Storage ports for the audit log and ban request stores.
//!
//! Both stores are independent resources without shared transactions; every
//! method is a single request/response against the backing service and maps
//! backend failures to `AppError::StoreUnavailable`.

use async_trait::async_trait;

use warden_core::AppResult;
use warden_domain::{
    ActionType, AuditLogCorrection, AuditLogEntry, AuditLogEntryId, BanRequest, BanRequestId,
    BanRequestReview, BanRequestStatus, NewAuditLogEntry, NewBanRequest,
};

/// Repository port for the append-only audit log.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Assigns id and timestamp and inserts the entry.
    async fn append_entry(&self, entry: NewAuditLogEntry) -> AppResult<AuditLogEntry>;

    /// Lists all entries, newest first.
    async fn list_entries(&self) -> AppResult<Vec<AuditLogEntry>>;

    /// Lists entries whose target equals `target` exactly, newest first.
    async fn list_entries_for_target(&self, target: &str) -> AppResult<Vec<AuditLogEntry>>;

    /// Finds one entry.
    async fn find_entry(&self, id: AuditLogEntryId) -> AppResult<Option<AuditLogEntry>>;

    /// Permanently removes an entry. Fails with `NotFound` if absent.
    async fn delete_entry(&self, id: AuditLogEntryId) -> AppResult<()>;

    /// Overwrites type, reason and duration, but only while the stored type
    /// still equals `expected`. Fails with `NotFound` if absent and with
    /// `InvalidTransition` if the type changed since it was read.
    async fn update_entry(
        &self,
        id: AuditLogEntryId,
        expected: ActionType,
        correction: AuditLogCorrection,
    ) -> AppResult<AuditLogEntry>;

    /// Sets the handled flag. Idempotent; fails with `NotFound` if absent.
    async fn mark_handled(&self, id: AuditLogEntryId) -> AppResult<AuditLogEntry>;

    /// Lists unhandled entries, oldest first, for enforcement consumers.
    async fn list_unhandled_entries(&self, limit: usize) -> AppResult<Vec<AuditLogEntry>>;
}

/// Repository port for ban requests.
#[async_trait]
pub trait BanRequestRepository: Send + Sync {
    /// Assigns id and timestamp and inserts the request as pending.
    async fn append_request(&self, request: NewBanRequest) -> AppResult<BanRequest>;

    /// Lists every request, optionally restricted to one status, newest first.
    async fn list_requests(&self, status: Option<BanRequestStatus>) -> AppResult<Vec<BanRequest>>;

    /// Lists requests filed by `username`, newest first.
    async fn list_requests_for_requester(&self, username: &str) -> AppResult<Vec<BanRequest>>;

    /// Finds one request.
    async fn find_request(&self, id: BanRequestId) -> AppResult<Option<BanRequest>>;

    /// Moves a pending request to its terminal status.
    ///
    /// Fails with `NotFound` if absent and `InvalidTransition` if the request
    /// is no longer pending. Implementations must make the pending check and
    /// the write a single conditional operation so that concurrent reviewers
    /// cannot both succeed.
    async fn set_status(
        &self,
        id: BanRequestId,
        review: BanRequestReview,
    ) -> AppResult<BanRequest>;
}
