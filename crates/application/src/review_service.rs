//! Ban request review: approval and denial.
//!
//! The audit log and the ban request store share no transaction, so approval
//! is a two-step write: the ban entry is appended first and the request is
//! transitioned second. The store's pending guard on `set_status` is what
//! keeps two concurrent approvals from both succeeding.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use warden_core::{AppError, AppResult, StaffIdentity};
use warden_domain::{
    AuditLogEntry, BanRequest, BanRequestId, BanRequestReview, BanRequestStatus, policy,
};

use crate::{AuditLogRepository, BanRequestRepository};

/// Result of a successful approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalOutcome {
    /// The request, now approved.
    pub request: BanRequest,
    /// The ban entry written to the audit log.
    pub entry: AuditLogEntry,
}

/// Application service for reviewing ban requests.
#[derive(Clone)]
pub struct ReviewService {
    requests: Arc<dyn BanRequestRepository>,
    audit_log: Arc<dyn AuditLogRepository>,
}

impl ReviewService {
    /// Creates a service over both stores.
    #[must_use]
    pub fn new(
        requests: Arc<dyn BanRequestRepository>,
        audit_log: Arc<dyn AuditLogRepository>,
    ) -> Self {
        Self {
            requests,
            audit_log,
        }
    }

    /// Approves a pending request and writes its ban to the audit log.
    ///
    /// Failure handling after the ban entry is written:
    /// - the request stopped being pending (another reviewer won): the entry
    ///   is removed again and `InvalidTransition` is returned;
    /// - any other store failure: the entry is kept, since a duplicate ban is
    ///   preferable to a lost one, and the error is returned for the caller
    ///   to re-check and retry.
    pub async fn approve(
        &self,
        reviewer: &StaffIdentity,
        request_id: BanRequestId,
    ) -> AppResult<ApprovalOutcome> {
        policy::ensure_reviewer(reviewer.role(), "approve ban requests")?;

        let request = self.load_pending(request_id).await?;

        let entry = self
            .audit_log
            .append_entry(request.to_ban_entry(reviewer.username()))
            .await?;

        let review = BanRequestReview {
            status: BanRequestStatus::Approved,
            reviewed_by: reviewer.username().to_owned(),
            reviewed_at: Utc::now(),
        };

        match self.requests.set_status(request_id, review).await {
            Ok(request) => {
                info!(
                    request_id = %request_id,
                    entry_id = %entry.id(),
                    target = %request.target(),
                    reviewed_by = %reviewer.username(),
                    "ban request approved"
                );
                Ok(ApprovalOutcome { request, entry })
            }
            Err(AppError::InvalidTransition(message)) => {
                self.compensate_lost_race(request_id, &entry).await;
                Err(AppError::InvalidTransition(message))
            }
            Err(error) => {
                warn!(
                    request_id = %request_id,
                    entry_id = %entry.id(),
                    error = %error,
                    "ban entry written but request status update failed"
                );
                Err(error)
            }
        }
    }

    /// Denies a pending request. No audit log entry is written.
    pub async fn deny(
        &self,
        reviewer: &StaffIdentity,
        request_id: BanRequestId,
    ) -> AppResult<BanRequest> {
        policy::ensure_reviewer(reviewer.role(), "deny ban requests")?;

        let request = self
            .requests
            .set_status(
                request_id,
                BanRequestReview {
                    status: BanRequestStatus::Denied,
                    reviewed_by: reviewer.username().to_owned(),
                    reviewed_at: Utc::now(),
                },
            )
            .await?;

        info!(
            request_id = %request_id,
            target = %request.target(),
            reviewed_by = %reviewer.username(),
            "ban request denied"
        );

        Ok(request)
    }

    async fn load_pending(&self, request_id: BanRequestId) -> AppResult<BanRequest> {
        let request = self
            .requests
            .find_request(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("ban request {request_id} does not exist")))?;

        request
            .status()
            .ensure_transition(BanRequestStatus::Approved)?;

        Ok(request)
    }

    async fn compensate_lost_race(&self, request_id: BanRequestId, entry: &AuditLogEntry) {
        match self.audit_log.delete_entry(entry.id()).await {
            Ok(()) => info!(
                request_id = %request_id,
                entry_id = %entry.id(),
                "ban request was reviewed concurrently; duplicate ban entry removed"
            ),
            Err(error) => warn!(
                request_id = %request_id,
                entry_id = %entry.id(),
                error = %error,
                "ban request was reviewed concurrently; duplicate ban entry could not be removed"
            ),
        }
    }
}
