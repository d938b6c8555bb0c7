//! Direct moderation actions and audit log maintenance.

use std::sync::Arc;

use tracing::info;
use warden_core::{AppError, AppResult, NonEmptyString, StaffIdentity};
use warden_domain::{
    ActionType, AuditLogCorrection, AuditLogEntry, AuditLogEntryId, BanDuration,
    ModerationAction, NewAuditLogEntry, policy, validate_evidence,
};

use crate::AuditLogRepository;

/// Input payload for a directly executed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitActionInput {
    /// Punishment kind.
    pub action_type: ActionType,
    /// Player identifier.
    pub target: String,
    /// Why the action is issued.
    pub reason: String,
    /// Supporting links; exactly three are required.
    pub evidence: Vec<String>,
    /// Ban length, required for bans and rejected otherwise.
    pub duration: Option<BanDuration>,
}

/// Input payload for correcting an audit log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectEntryInput {
    /// Replacement punishment kind.
    pub action_type: ActionType,
    /// Replacement reason.
    pub reason: String,
    /// Replacement ban length.
    pub duration: Option<BanDuration>,
}

/// Application service for staff-issued actions and the audit log.
#[derive(Clone)]
pub struct ModerationService {
    audit_log: Arc<dyn AuditLogRepository>,
}

impl ModerationService {
    /// Creates a service from an audit log repository.
    #[must_use]
    pub fn new(audit_log: Arc<dyn AuditLogRepository>) -> Self {
        Self { audit_log }
    }

    /// Writes an action straight to the audit log.
    ///
    /// Role policy and evidence validation both run before the write, so a
    /// rejected submission leaves no state behind.
    pub async fn submit_action(
        &self,
        actor: &StaffIdentity,
        input: SubmitActionInput,
    ) -> AppResult<AuditLogEntry> {
        policy::ensure_direct_submission(actor.role(), input.action_type)?;

        let action = ModerationAction::from_parts(input.action_type, input.duration)?;
        let target = NonEmptyString::for_field("target", input.target)?;
        let reason = NonEmptyString::for_field("reason", input.reason)?;
        let evidence = validate_evidence(&input.evidence)?;

        let entry = self
            .audit_log
            .append_entry(NewAuditLogEntry {
                action,
                target,
                reason,
                evidence,
                issued_by: actor.username().to_owned(),
            })
            .await?;

        info!(
            entry_id = %entry.id(),
            action = %entry.action_type(),
            target = %entry.target(),
            issued_by = %entry.issued_by(),
            "moderation action recorded"
        );

        Ok(entry)
    }

    /// Lists the audit log newest first, optionally for a single target.
    pub async fn list_entries(
        &self,
        _actor: &StaffIdentity,
        target: Option<&str>,
    ) -> AppResult<Vec<AuditLogEntry>> {
        match target.map(str::trim).filter(|value| !value.is_empty()) {
            Some(target) => self.audit_log.list_entries_for_target(target).await,
            None => self.audit_log.list_entries().await,
        }
    }

    /// Permanently removes an entry. Reviewers only.
    pub async fn delete_entry(&self, actor: &StaffIdentity, id: AuditLogEntryId) -> AppResult<()> {
        policy::ensure_reviewer(actor.role(), "delete audit log entries")?;
        self.audit_log.delete_entry(id).await?;

        info!(entry_id = %id, deleted_by = %actor.username(), "audit log entry deleted");
        Ok(())
    }

    /// Corrects type, reason and duration of an entry.
    ///
    /// The caller must meet the edit threshold of both the entry's current
    /// type and the requested type. The write only lands if the stored type
    /// is still the one the thresholds were checked against.
    pub async fn correct_entry(
        &self,
        actor: &StaffIdentity,
        id: AuditLogEntryId,
        input: CorrectEntryInput,
    ) -> AppResult<AuditLogEntry> {
        let action = ModerationAction::from_parts(input.action_type, input.duration)?;
        let reason = NonEmptyString::for_field("reason", input.reason)?;

        let current = self
            .audit_log
            .find_entry(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("audit log entry {id} does not exist")))?;

        policy::ensure_can_edit(actor.role(), current.action_type(), input.action_type)?;

        let updated = self
            .audit_log
            .update_entry(id, current.action_type(), AuditLogCorrection { action, reason })
            .await?;

        info!(
            entry_id = %id,
            action = %updated.action_type(),
            edited_by = %actor.username(),
            "audit log entry corrected"
        );

        Ok(updated)
    }
}
