use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warden_core::NonEmptyString;

use crate::{ActionType, BanDuration, Evidence, ModerationAction};

/// Store-assigned audit log entry identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AuditLogEntryId(i64);

impl AuditLogEntryId {
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

impl std::fmt::Display for AuditLogEntryId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A validated action waiting to be appended to the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditLogEntry {
    /// Punishment and its duration.
    pub action: ModerationAction,
    /// Player identifier.
    pub target: NonEmptyString,
    /// Why the action was issued.
    pub reason: NonEmptyString,
    /// Supporting links.
    pub evidence: Evidence,
    /// Staff username recorded as issuer.
    pub issued_by: String,
}

/// Correction applied by an authorized editor.
///
/// Only these fields of an entry may change after it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogCorrection {
    /// Replacement punishment and duration.
    pub action: ModerationAction,
    /// Replacement reason.
    pub reason: NonEmptyString,
}

/// One issued moderation action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogEntry {
    id: AuditLogEntryId,
    action: ModerationAction,
    target: NonEmptyString,
    reason: NonEmptyString,
    evidence: Evidence,
    issued_by: String,
    created_at: DateTime<Utc>,
    handled: bool,
}

impl AuditLogEntry {
    /// Materializes an appended entry. New entries start unhandled.
    #[must_use]
    pub fn new(id: AuditLogEntryId, entry: NewAuditLogEntry, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            action: entry.action,
            target: entry.target,
            reason: entry.reason,
            evidence: entry.evidence,
            issued_by: entry.issued_by,
            created_at,
            handled: false,
        }
    }

    /// Rebuilds an entry loaded from storage.
    #[must_use]
    pub fn with_handled(mut self, handled: bool) -> Self {
        self.handled = handled;
        self
    }

    /// Returns the entry identifier.
    #[must_use]
    pub fn id(&self) -> AuditLogEntryId {
        self.id
    }

    /// Returns the punishment with its payload.
    #[must_use]
    pub fn action(&self) -> ModerationAction {
        self.action
    }

    /// Returns the flat action type.
    #[must_use]
    pub fn action_type(&self) -> ActionType {
        self.action.action_type()
    }

    /// Returns the ban duration, present only for bans.
    #[must_use]
    pub fn duration(&self) -> Option<BanDuration> {
        self.action.duration()
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

    /// Returns the issuing staff username.
    #[must_use]
    pub fn issued_by(&self) -> &str {
        self.issued_by.as_str()
    }

    /// Returns when the entry was appended.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns whether an enforcement consumer has picked the entry up.
    #[must_use]
    pub fn handled(&self) -> bool {
        self.handled
    }

    /// Overwrites type, reason and duration; identity, target, evidence,
    /// issuer and timestamp are preserved.
    pub fn apply_correction(&mut self, correction: AuditLogCorrection) {
        self.action = correction.action;
        self.reason = correction.reason;
    }

    /// Marks the entry as consumed. Idempotent.
    pub fn mark_handled(&mut self) {
        self.handled = true;
    }
}

/// Newest-first ordering shared by every audit log listing: timestamp
/// descending, ties broken by id descending.
#[must_use]
pub fn newest_first(left: &AuditLogEntry, right: &AuditLogEntry) -> std::cmp::Ordering {
    right
        .created_at
        .cmp(&left.created_at)
        .then_with(|| right.id.cmp(&left.id))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use warden_core::{AppResult, NonEmptyString};

    use super::*;

    fn draft(action: ModerationAction) -> AppResult<NewAuditLogEntry> {
        Ok(NewAuditLogEntry {
            action,
            target: NonEmptyString::new("Alice")?,
            reason: NonEmptyString::new("spam")?,
            evidence: Evidence::new(["a", "b", "c"])?,
            issued_by: "helper_tom".to_owned(),
        })
    }

    #[test]
    fn correction_preserves_identity_fields() -> AppResult<()> {
        let created_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().unwrap_or_default();
        let mut entry = AuditLogEntry::new(
            AuditLogEntryId::new(7),
            draft(ModerationAction::Warn)?,
            created_at,
        );

        entry.apply_correction(AuditLogCorrection {
            action: ModerationAction::Ban(BanDuration::TenDays),
            reason: NonEmptyString::new("repeat offender")?,
        });

        assert_eq!(entry.id(), AuditLogEntryId::new(7));
        assert_eq!(entry.target(), "Alice");
        assert_eq!(entry.issued_by(), "helper_tom");
        assert_eq!(entry.created_at(), created_at);
        assert_eq!(entry.duration(), Some(BanDuration::TenDays));
        assert_eq!(entry.reason(), "repeat offender");
        Ok(())
    }

    #[test]
    fn ordering_breaks_timestamp_ties_by_id() -> AppResult<()> {
        let created_at = Utc::now();
        let older = AuditLogEntry::new(AuditLogEntryId::new(1), draft(ModerationAction::Kick)?, created_at);
        let newer = AuditLogEntry::new(AuditLogEntryId::new(2), draft(ModerationAction::Kick)?, created_at);

        let mut entries = vec![older, newer];
        entries.sort_by(newest_first);
        assert_eq!(entries[0].id(), AuditLogEntryId::new(2));
        Ok(())
    }
}
