use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use warden_application::AuditLogRepository;
use warden_core::{AppError, AppResult};
use warden_domain::{
    ActionType, AuditLogCorrection, AuditLogEntry, AuditLogEntryId, NewAuditLogEntry,
    newest_first,
};

/// In-memory audit log, used by local runs without PostgreSQL and by API
/// tests.
#[derive(Debug, Default)]
pub struct InMemoryAuditLogRepository {
    state: RwLock<AuditLogState>,
}

#[derive(Debug, Default)]
struct AuditLogState {
    last_id: i64,
    entries: BTreeMap<AuditLogEntryId, AuditLogEntry>,
}

impl InMemoryAuditLogRepository {
    /// Creates an empty in-memory audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(id: AuditLogEntryId) -> AppError {
    AppError::NotFound(format!("audit log entry {id} does not exist"))
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLogRepository {
    async fn append_entry(&self, entry: NewAuditLogEntry) -> AppResult<AuditLogEntry> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let id = AuditLogEntryId::new(state.last_id);
        let stored = AuditLogEntry::new(id, entry, Utc::now());
        state.entries.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_entries(&self) -> AppResult<Vec<AuditLogEntry>> {
        let mut entries: Vec<AuditLogEntry> =
            self.state.read().await.entries.values().cloned().collect();
        entries.sort_by(newest_first);
        Ok(entries)
    }

    async fn list_entries_for_target(&self, target: &str) -> AppResult<Vec<AuditLogEntry>> {
        let mut entries: Vec<AuditLogEntry> = self
            .state
            .read()
            .await
            .entries
            .values()
            .filter(|entry| entry.target() == target)
            .cloned()
            .collect();
        entries.sort_by(newest_first);
        Ok(entries)
    }

    async fn find_entry(&self, id: AuditLogEntryId) -> AppResult<Option<AuditLogEntry>> {
        Ok(self.state.read().await.entries.get(&id).cloned())
    }

    async fn delete_entry(&self, id: AuditLogEntryId) -> AppResult<()> {
        self.state
            .write()
            .await
            .entries
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    async fn update_entry(
        &self,
        id: AuditLogEntryId,
        expected: ActionType,
        correction: AuditLogCorrection,
    ) -> AppResult<AuditLogEntry> {
        let mut state = self.state.write().await;
        let entry = state.entries.get_mut(&id).ok_or_else(|| not_found(id))?;
        if entry.action_type() != expected {
            return Err(AppError::InvalidTransition(format!(
                "audit log entry {id} changed while being corrected"
            )));
        }
        entry.apply_correction(correction);
        Ok(entry.clone())
    }

    async fn mark_handled(&self, id: AuditLogEntryId) -> AppResult<AuditLogEntry> {
        let mut state = self.state.write().await;
        let entry = state.entries.get_mut(&id).ok_or_else(|| not_found(id))?;
        entry.mark_handled();
        Ok(entry.clone())
    }

    async fn list_unhandled_entries(&self, limit: usize) -> AppResult<Vec<AuditLogEntry>> {
        let mut entries: Vec<AuditLogEntry> = self
            .state
            .read()
            .await
            .entries
            .values()
            .filter(|entry| !entry.handled())
            .cloned()
            .collect();
        entries.sort_by(|left, right| newest_first(right, left));
        entries.truncate(limit);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use warden_application::AuditLogRepository;
    use warden_core::{AppError, AppResult, NonEmptyString};
    use warden_domain::{
        ActionType, AuditLogCorrection, BanDuration, Evidence, ModerationAction, NewAuditLogEntry,
    };

    use super::InMemoryAuditLogRepository;

    fn correction(action: ModerationAction, reason: &str) -> AppResult<AuditLogCorrection> {
        Ok(AuditLogCorrection {
            action,
            reason: NonEmptyString::new(reason)?,
        })
    }

    #[tokio::test]
    async fn correction_against_stale_type_is_rejected() -> AppResult<()> {
        let repository = InMemoryAuditLogRepository::new();
        let entry = repository
            .append_entry(NewAuditLogEntry {
                action: ModerationAction::Warn,
                target: NonEmptyString::new("Alice")?,
                reason: NonEmptyString::new("spam")?,
                evidence: Evidence::new(["a", "b", "c"])?,
                issued_by: "helper_tom".to_owned(),
            })
            .await?;

        repository
            .update_entry(
                entry.id(),
                ActionType::Warn,
                correction(ModerationAction::Ban(BanDuration::ThreeDays), "escalated")?,
            )
            .await?;

        let stale = repository
            .update_entry(
                entry.id(),
                ActionType::Warn,
                correction(ModerationAction::Kick, "griefing")?,
            )
            .await;
        assert!(matches!(stale, Err(AppError::InvalidTransition(_))));

        let stored = repository.find_entry(entry.id()).await?;
        assert_eq!(
            stored.map(|entry| entry.action_type()),
            Some(ActionType::Ban)
        );
        Ok(())
    }
}
