use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warden_core::{AppError, AppResult, NonEmptyString};

use crate::{BanDuration, Evidence, ModerationAction, NewAuditLogEntry};

/// Store-assigned ban request identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BanRequestId(i64);

impl BanRequestId {
    /// Wraps a store-assigned identifier.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for BanRequestId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Review state of a ban request.
///
/// `Pending` is the only non-terminal state; it moves once to `Approved` or
/// `Denied` and never again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BanRequestStatus {
    /// Awaiting review.
    Pending,
    /// Approved; a ban entry was written to the audit log.
    Approved,
    /// Denied; no audit log entry exists.
    Denied,
}

impl BanRequestStatus {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Fails with `InvalidTransition` unless `self -> next` is
    /// `Pending -> Approved` or `Pending -> Denied`.
    pub fn ensure_transition(self, next: Self) -> AppResult<()> {
        match (self, next) {
            (Self::Pending, Self::Approved | Self::Denied) => Ok(()),
            (Self::Pending, Self::Pending) => Err(AppError::InvalidTransition(
                "ban request can only move to approved or denied".to_owned(),
            )),
            (current, _) => Err(AppError::InvalidTransition(format!(
                "ban request was already {}",
                current.as_str()
            ))),
        }
    }
}

impl FromStr for BanRequestStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "denied" => Ok(Self::Denied),
            _ => Err(AppError::Validation(format!(
                "unknown ban request status '{value}'"
            ))),
        }
    }
}

/// A validated ban proposal waiting to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBanRequest {
    /// Player identifier.
    pub target: NonEmptyString,
    /// Why the ban is requested.
    pub reason: NonEmptyString,
    /// Supporting links.
    pub evidence: Evidence,
    /// Proposed ban length.
    pub duration: BanDuration,
    /// Staff username of the requester.
    pub requested_by: String,
}

/// Ban proposal filed by lower-privileged staff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRequest {
    id: BanRequestId,
    target: NonEmptyString,
    reason: NonEmptyString,
    evidence: Evidence,
    duration: BanDuration,
    requested_by: String,
    status: BanRequestStatus,
    reviewed_by: Option<String>,
    created_at: DateTime<Utc>,
    reviewed_at: Option<DateTime<Utc>>,
}

/// Review outcome stored alongside a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRequestReview {
    /// Terminal status.
    pub status: BanRequestStatus,
    /// Reviewer username.
    pub reviewed_by: String,
    /// When the review happened.
    pub reviewed_at: DateTime<Utc>,
}

impl BanRequest {
    /// Materializes an appended request. New requests start pending.
    #[must_use]
    pub fn new(id: BanRequestId, request: NewBanRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            target: request.target,
            reason: request.reason,
            evidence: request.evidence,
            duration: request.duration,
            requested_by: request.requested_by,
            status: BanRequestStatus::Pending,
            reviewed_by: None,
            created_at,
            reviewed_at: None,
        }
    }

    /// Rebuilds a reviewed request loaded from storage.
    #[must_use]
    pub fn with_review(mut self, review: Option<BanRequestReview>) -> Self {
        match review {
            Some(review) => {
                self.status = review.status;
                self.reviewed_by = Some(review.reviewed_by);
                self.reviewed_at = Some(review.reviewed_at);
            }
            None => {
                self.status = BanRequestStatus::Pending;
                self.reviewed_by = None;
                self.reviewed_at = None;
            }
        }
        self
    }

    /// Returns the request identifier.
    #[must_use]
    pub fn id(&self) -> BanRequestId {
        self.id
    }

    /// Returns the player identifier.
    #[must_use]
    pub fn target(&self) -> &str {
        self.target.as_str()
    }

    /// Returns the reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        self.reason.as_str()
    }

    /// Returns the evidence.
    #[must_use]
    pub fn evidence(&self) -> &Evidence {
        &self.evidence
    }

    /// Returns the proposed duration.
    #[must_use]
    pub fn duration(&self) -> BanDuration {
        self.duration
    }

    /// Returns the requester username.
    #[must_use]
    pub fn requested_by(&self) -> &str {
        self.requested_by.as_str()
    }

    /// Returns the review status.
    #[must_use]
    pub fn status(&self) -> BanRequestStatus {
        self.status
    }

    /// Returns the reviewer, once reviewed.
    #[must_use]
    pub fn reviewed_by(&self) -> Option<&str> {
        self.reviewed_by.as_deref()
    }

    /// Returns when the request was filed.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the request was reviewed.
    #[must_use]
    pub fn reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.reviewed_at
    }

    /// Applies a review, enforcing the write-once status rule.
    pub fn review(&mut self, review: BanRequestReview) -> AppResult<()> {
        self.status.ensure_transition(review.status)?;
        self.status = review.status;
        self.reviewed_by = Some(review.reviewed_by);
        self.reviewed_at = Some(review.reviewed_at);
        Ok(())
    }

    /// Copies the request into the ban entry written on approval.
    #[must_use]
    pub fn to_ban_entry(&self, reviewer: &str) -> NewAuditLogEntry {
        NewAuditLogEntry {
            action: ModerationAction::Ban(self.duration),
            target: self.target.clone(),
            reason: self.reason.clone(),
            evidence: self.evidence.clone(),
            issued_by: reviewer.to_owned(),
        }
    }
}

/// Newest-first ordering for ban request listings.
#[must_use]
pub fn newest_request_first(left: &BanRequest, right: &BanRequest) -> std::cmp::Ordering {
    right
        .created_at
        .cmp(&left.created_at)
        .then_with(|| right.id.cmp(&left.id))
}
