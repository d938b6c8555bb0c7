use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use warden_application::BanRequestRepository;
use warden_core::{AppError, AppResult};
use warden_domain::{
    BanRequest, BanRequestId, BanRequestReview, BanRequestStatus, NewBanRequest,
    newest_request_first,
};

/// In-memory ban request store. The write lock makes `set_status` a single
/// conditional step.
#[derive(Debug, Default)]
pub struct InMemoryBanRequestRepository {
    state: RwLock<BanRequestState>,
}

#[derive(Debug, Default)]
struct BanRequestState {
    last_id: i64,
    requests: BTreeMap<BanRequestId, BanRequest>,
}

impl InMemoryBanRequestRepository {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn collect_sorted(&self, keep: impl Fn(&BanRequest) -> bool) -> Vec<BanRequest> {
        let mut requests: Vec<BanRequest> = self
            .state
            .read()
            .await
            .requests
            .values()
            .filter(|request| keep(request))
            .cloned()
            .collect();
        requests.sort_by(newest_request_first);
        requests
    }
}

#[async_trait]
impl BanRequestRepository for InMemoryBanRequestRepository {
    async fn append_request(&self, request: NewBanRequest) -> AppResult<BanRequest> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let id = BanRequestId::new(state.last_id);
        let stored = BanRequest::new(id, request, Utc::now());
        state.requests.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_requests(&self, status: Option<BanRequestStatus>) -> AppResult<Vec<BanRequest>> {
        Ok(self
            .collect_sorted(|request| status.is_none_or(|status| request.status() == status))
            .await)
    }

    async fn list_requests_for_requester(&self, username: &str) -> AppResult<Vec<BanRequest>> {
        Ok(self
            .collect_sorted(|request| request.requested_by() == username)
            .await)
    }

    async fn find_request(&self, id: BanRequestId) -> AppResult<Option<BanRequest>> {
        Ok(self.state.read().await.requests.get(&id).cloned())
    }

    async fn set_status(
        &self,
        id: BanRequestId,
        review: BanRequestReview,
    ) -> AppResult<BanRequest> {
        let mut state = self.state.write().await;
        let request = state
            .requests
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("ban request {id} does not exist")))?;
        request.review(review)?;
        Ok(request.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use warden_application::BanRequestRepository;
    use warden_core::{AppError, AppResult, NonEmptyString};
    use warden_domain::{BanDuration, BanRequestReview, BanRequestStatus, Evidence, NewBanRequest};

    use super::InMemoryBanRequestRepository;

    #[tokio::test]
    async fn parallel_reviews_produce_exactly_one_transition() -> AppResult<()> {
        let repository = Arc::new(InMemoryBanRequestRepository::new());
        let request = repository
            .append_request(NewBanRequest {
                target: NonEmptyString::new("Bob")?,
                reason: NonEmptyString::new("aimbot")?,
                evidence: Evidence::new(["a", "b", "c"])?,
                duration: BanDuration::OneDay,
                requested_by: "helper_tom".to_owned(),
            })
            .await?;

        let mut handles = Vec::new();
        for reviewer in ["senior_a", "senior_b", "senior_c", "senior_d"] {
            let repository = repository.clone();
            let id = request.id();
            handles.push(tokio::spawn(async move {
                repository
                    .set_status(
                        id,
                        BanRequestReview {
                            status: BanRequestStatus::Approved,
                            reviewed_by: reviewer.to_owned(),
                            reviewed_at: Utc::now(),
                        },
                    )
                    .await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            match handle.await {
                Ok(Ok(_)) => winners += 1,
                Ok(Err(AppError::InvalidTransition(_))) => {}
                Ok(Err(error)) => return Err(error),
                Err(error) => return Err(AppError::Internal(error.to_string())),
            }
        }

        assert_eq!(winners, 1);
        Ok(())
    }
}
