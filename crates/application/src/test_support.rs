//! Fake repositories shared by the service tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use warden_core::{AppError, AppResult, StaffIdentity, StaffRole};
use warden_domain::{
    ActionType, AuditLogCorrection, AuditLogEntry, AuditLogEntryId, BanRequest, BanRequestId,
    BanRequestReview, BanRequestStatus, NewAuditLogEntry, NewBanRequest, newest_first,
    newest_request_first,
};

use crate::{AuditLogRepository, BanRequestRepository};

pub(crate) fn helper() -> StaffIdentity {
    StaffIdentity::new("helper_tom", StaffRole::Helper)
}

pub(crate) fn other_helper() -> StaffIdentity {
    StaffIdentity::new("helper_lea", StaffRole::Helper)
}

pub(crate) fn moderator() -> StaffIdentity {
    StaffIdentity::new("mod_kate", StaffRole::Moderator)
}

pub(crate) fn senior() -> StaffIdentity {
    StaffIdentity::new("senior_ana", StaffRole::Senior)
}

pub(crate) fn evidence() -> Vec<String> {
    vec![
        "https://clips.example/1".to_owned(),
        "https://clips.example/2".to_owned(),
        "https://clips.example/3".to_owned(),
    ]
}

#[derive(Default)]
pub(crate) struct FakeAuditLogRepository {
    pub(crate) entries: Mutex<Vec<AuditLogEntry>>,
    pub(crate) fail_appends: AtomicBool,
}

impl FakeAuditLogRepository {
    pub(crate) async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[async_trait]
impl AuditLogRepository for FakeAuditLogRepository {
    async fn append_entry(&self, entry: NewAuditLogEntry) -> AppResult<AuditLogEntry> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable("audit log offline".to_owned()));
        }

        let mut entries = self.entries.lock().await;
        let next_id = entries
            .iter()
            .map(|entry| entry.id().as_i64())
            .max()
            .unwrap_or(0)
            + 1;
        let stored = AuditLogEntry::new(AuditLogEntryId::new(next_id), entry, Utc::now());
        entries.push(stored.clone());
        Ok(stored)
    }

    async fn list_entries(&self) -> AppResult<Vec<AuditLogEntry>> {
        let mut entries = self.entries.lock().await.clone();
        entries.sort_by(newest_first);
        Ok(entries)
    }

    async fn list_entries_for_target(&self, target: &str) -> AppResult<Vec<AuditLogEntry>> {
        let mut entries: Vec<AuditLogEntry> = self
            .entries
            .lock()
            .await
            .iter()
            .filter(|entry| entry.target() == target)
            .cloned()
            .collect();
        entries.sort_by(newest_first);
        Ok(entries)
    }

    async fn find_entry(&self, id: AuditLogEntryId) -> AppResult<Option<AuditLogEntry>> {
        Ok(self
            .entries
            .lock()
            .await
            .iter()
            .find(|entry| entry.id() == id)
            .cloned())
    }

    async fn delete_entry(&self, id: AuditLogEntryId) -> AppResult<()> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|entry| entry.id() != id);
        if entries.len() == before {
            return Err(AppError::NotFound(format!("audit log entry {id} does not exist")));
        }
        Ok(())
    }

    async fn update_entry(
        &self,
        id: AuditLogEntryId,
        expected: ActionType,
        correction: AuditLogCorrection,
    ) -> AppResult<AuditLogEntry> {
        let mut entries = self.entries.lock().await;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("audit log entry {id} does not exist")))?;
        if entry.action_type() != expected {
            return Err(AppError::InvalidTransition(format!(
                "audit log entry {id} changed while being corrected"
            )));
        }
        entry.apply_correction(correction);
        Ok(entry.clone())
    }

    async fn mark_handled(&self, id: AuditLogEntryId) -> AppResult<AuditLogEntry> {
        let mut entries = self.entries.lock().await;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("audit log entry {id} does not exist")))?;
        entry.mark_handled();
        Ok(entry.clone())
    }

    async fn list_unhandled_entries(&self, limit: usize) -> AppResult<Vec<AuditLogEntry>> {
        let mut entries: Vec<AuditLogEntry> = self
            .entries
            .lock()
            .await
            .iter()
            .filter(|entry| !entry.handled())
            .cloned()
            .collect();
        entries.sort_by(|left, right| newest_first(right, left));
        entries.truncate(limit);
        Ok(entries)
    }
}

#[derive(Default)]
pub(crate) struct FakeBanRequestRepository {
    pub(crate) requests: Mutex<Vec<BanRequest>>,
    /// Simulates a concurrent reviewer winning the race: the next
    /// `set_status` call reviews the request as someone else first.
    pub(crate) lose_next_race: AtomicBool,
    pub(crate) fail_status_updates: AtomicBool,
}

#[async_trait]
impl BanRequestRepository for FakeBanRequestRepository {
    async fn append_request(&self, request: NewBanRequest) -> AppResult<BanRequest> {
        let mut requests = self.requests.lock().await;
        let next_id = i64::try_from(requests.len()).unwrap_or(i64::MAX) + 1;
        let stored = BanRequest::new(BanRequestId::new(next_id), request, Utc::now());
        requests.push(stored.clone());
        Ok(stored)
    }

    async fn list_requests(&self, status: Option<BanRequestStatus>) -> AppResult<Vec<BanRequest>> {
        let mut requests: Vec<BanRequest> = self
            .requests
            .lock()
            .await
            .iter()
            .filter(|request| status.is_none_or(|status| request.status() == status))
            .cloned()
            .collect();
        requests.sort_by(newest_request_first);
        Ok(requests)
    }

    async fn list_requests_for_requester(&self, username: &str) -> AppResult<Vec<BanRequest>> {
        let mut requests: Vec<BanRequest> = self
            .requests
            .lock()
            .await
            .iter()
            .filter(|request| request.requested_by() == username)
            .cloned()
            .collect();
        requests.sort_by(newest_request_first);
        Ok(requests)
    }

    async fn find_request(&self, id: BanRequestId) -> AppResult<Option<BanRequest>> {
        Ok(self
            .requests
            .lock()
            .await
            .iter()
            .find(|request| request.id() == id)
            .cloned())
    }

    async fn set_status(
        &self,
        id: BanRequestId,
        review: BanRequestReview,
    ) -> AppResult<BanRequest> {
        if self.fail_status_updates.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable("ban requests offline".to_owned()));
        }

        let mut requests = self.requests.lock().await;
        let request = requests
            .iter_mut()
            .find(|request| request.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("ban request {id} does not exist")))?;

        if self.lose_next_race.swap(false, Ordering::SeqCst) {
            request.review(BanRequestReview {
                status: BanRequestStatus::Approved,
                reviewed_by: "senior_other".to_owned(),
                reviewed_at: Utc::now(),
            })?;
        }

        request.review(review)?;
        Ok(request.clone())
    }
}
