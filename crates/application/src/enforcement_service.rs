use std::sync::Arc;

use tracing::info;
use warden_core::AppResult;
use warden_domain::{AuditLogEntry, AuditLogEntryId};

use crate::AuditLogRepository;

/// Largest batch an enforcement consumer may request at once.
pub const MAX_ENFORCEMENT_BATCH: usize = 100;

/// Hands unhandled audit log entries to the game-server relay and records
/// which ones it has applied.
#[derive(Clone)]
pub struct EnforcementService {
    audit_log: Arc<dyn AuditLogRepository>,
}

impl EnforcementService {
    /// Creates a new enforcement service.
    #[must_use]
    pub fn new(audit_log: Arc<dyn AuditLogRepository>) -> Self {
        Self { audit_log }
    }

    /// Lists unhandled entries, oldest first. `limit` is clamped to
    /// `1..=MAX_ENFORCEMENT_BATCH`.
    pub async fn pending_entries(&self, limit: usize) -> AppResult<Vec<AuditLogEntry>> {
        let limit = limit.clamp(1, MAX_ENFORCEMENT_BATCH);
        self.audit_log.list_unhandled_entries(limit).await
    }

    /// Marks an entry as applied on the game server. Repeating the call is
    /// harmless.
    pub async fn mark_handled(&self, id: AuditLogEntryId) -> AppResult<AuditLogEntry> {
        let entry = self.audit_log.mark_handled(id).await?;
        info!(
            entry_id = %id,
            action = %entry.action_type(),
            target = %entry.target(),
            "audit log entry enforced"
        );
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use warden_core::{AppError, AppResult};
    use warden_domain::{ActionType, AuditLogEntryId};

    use crate::test_support::{FakeAuditLogRepository, evidence, helper};
    use crate::{ModerationService, SubmitActionInput};

    use super::EnforcementService;

    #[tokio::test]
    async fn handled_entries_leave_the_queue_oldest_first() -> AppResult<()> {
        let audit_log = Arc::new(FakeAuditLogRepository::default());
        let moderation = ModerationService::new(audit_log.clone());
        let enforcement = EnforcementService::new(audit_log);

        let mut ids = Vec::new();
        for target in ["Alice", "Bob", "Carol"] {
            let entry = moderation
                .submit_action(
                    &helper(),
                    SubmitActionInput {
                        action_type: ActionType::Warn,
                        target: target.to_owned(),
                        reason: "spam".to_owned(),
                        evidence: evidence(),
                        duration: None,
                    },
                )
                .await?;
            ids.push(entry.id());
        }

        let batch = enforcement.pending_entries(0).await?;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id(), ids[0]);

        let handled = enforcement.mark_handled(ids[0]).await?;
        assert!(handled.handled());
        enforcement.mark_handled(ids[0]).await?;

        let remaining = enforcement.pending_entries(10).await?;
        let remaining_ids: Vec<_> = remaining.iter().map(|entry| entry.id()).collect();
        assert_eq!(remaining_ids, vec![ids[1], ids[2]]);
        Ok(())
    }

    #[tokio::test]
    async fn marking_unknown_entry_is_not_found() {
        let enforcement = EnforcementService::new(Arc::new(FakeAuditLogRepository::default()));

        let result = enforcement.mark_handled(AuditLogEntryId::new(7)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
