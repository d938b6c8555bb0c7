use std::sync::Arc;

use tracing::info;
use warden_core::{AppError, AppResult, NonEmptyString, StaffIdentity};
use warden_domain::{
    BanDuration, BanRequest, BanRequestStatus, NewBanRequest, policy, validate_evidence,
};

use crate::BanRequestRepository;

/// Input payload for filing a ban request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitBanRequestInput {
    /// Player identifier.
    pub target: String,
    /// Why the ban is requested.
    pub reason: String,
    /// Supporting links; exactly three are required.
    pub evidence: Vec<String>,
    /// Proposed ban length.
    pub duration: BanDuration,
}

/// Application service for filing and listing ban requests.
#[derive(Clone)]
pub struct BanRequestService {
    requests: Arc<dyn BanRequestRepository>,
}

impl BanRequestService {
    /// Creates a service from a ban request repository.
    #[must_use]
    pub fn new(requests: Arc<dyn BanRequestRepository>) -> Self {
        Self { requests }
    }

    /// Files a pending ban request. Only roles that cannot ban directly may
    /// file one.
    pub async fn submit_request(
        &self,
        actor: &StaffIdentity,
        input: SubmitBanRequestInput,
    ) -> AppResult<BanRequest> {
        if !policy::can_file_ban_request(actor.role()) {
            return Err(AppError::Forbidden(format!(
                "role {} bans directly and cannot file ban requests",
                actor.role()
            )));
        }

        let target = NonEmptyString::for_field("target", input.target)?;
        let reason = NonEmptyString::for_field("reason", input.reason)?;
        let evidence = validate_evidence(&input.evidence)?;

        let request = self
            .requests
            .append_request(NewBanRequest {
                target,
                reason,
                evidence,
                duration: input.duration,
                requested_by: actor.username().to_owned(),
            })
            .await?;

        info!(
            request_id = %request.id(),
            target = %request.target(),
            duration = %request.duration().label(),
            requested_by = %request.requested_by(),
            "ban request filed"
        );

        Ok(request)
    }

    /// Lists every request. Reviewers only.
    pub async fn list_all(
        &self,
        actor: &StaffIdentity,
        status: Option<BanRequestStatus>,
    ) -> AppResult<Vec<BanRequest>> {
        policy::ensure_reviewer(actor.role(), "list all ban requests")?;
        self.requests.list_requests(status).await
    }

    /// Lists requests filed by the caller.
    pub async fn list_own(
        &self,
        actor: &StaffIdentity,
        status: Option<BanRequestStatus>,
    ) -> AppResult<Vec<BanRequest>> {
        let mut requests = self
            .requests
            .list_requests_for_requester(actor.username())
            .await?;
        if let Some(status) = status {
            requests.retain(|request| request.status() == status);
        }
        Ok(requests)
    }

    /// Lists what the caller may see: everything for reviewers, otherwise
    /// the caller's own requests.
    pub async fn list_visible(
        &self,
        actor: &StaffIdentity,
        status: Option<BanRequestStatus>,
    ) -> AppResult<Vec<BanRequest>> {
        if policy::is_reviewer(actor.role()) {
            self.list_all(actor, status).await
        } else {
            self.list_own(actor, status).await
        }
    }
}
