use serde::{Deserialize, Serialize};
use ts_rs::TS;
use warden_domain::AuditLogEntry;

/// Incoming payload for a direct moderation action.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/submit-action-request.ts"
)]
pub struct SubmitActionRequest {
    /// `warn`, `kick` or `ban` (case-insensitive).
    pub action_type: String,
    pub target: String,
    pub reason: String,
    pub evidence: Vec<String>,
    /// Required for bans, e.g. `3 Days` or `Permanent`.
    #[serde(default)]
    pub duration: Option<String>,
}

/// Incoming payload for correcting an audit log entry.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/correct-entry-request.ts"
)]
pub struct CorrectEntryRequest {
    pub action_type: String,
    pub reason: String,
    #[serde(default)]
    pub duration: Option<String>,
}

/// Query string for the audit log listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListLogsQuery {
    pub target: Option<String>,
}

/// API representation of an audit log entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/audit-log-entry-response.ts"
)]
pub struct AuditLogEntryResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub action_type: String,
    pub target: String,
    pub reason: String,
    pub evidence: Vec<String>,
    pub issued_by: String,
    pub duration: Option<String>,
    pub created_at: String,
    pub handled: bool,
}

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(entry: AuditLogEntry) -> Self {
        Self {
            id: entry.id().as_i64(),
            action_type: entry.action_type().as_str().to_owned(),
            target: entry.target().to_owned(),
            reason: entry.reason().to_owned(),
            evidence: entry.evidence().clone().into(),
            issued_by: entry.issued_by().to_owned(),
            duration: entry.duration().map(|duration| duration.label().to_owned()),
            created_at: entry.created_at().to_rfc3339(),
            handled: entry.handled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use warden_core::{AppResult, NonEmptyString};
    use warden_domain::{
        AuditLogEntry, AuditLogEntryId, BanDuration, Evidence, ModerationAction, NewAuditLogEntry,
    };

    use super::AuditLogEntryResponse;

    #[test]
    fn ban_entry_serializes_with_duration_label() -> AppResult<()> {
        let created_at = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .unwrap_or_default();
        let entry = AuditLogEntry::new(
            AuditLogEntryId::new(7),
            NewAuditLogEntry {
                action: ModerationAction::Ban(BanDuration::FourteenDays),
                target: NonEmptyString::new("mallory")?,
                reason: NonEmptyString::new("ban evasion")?,
                evidence: Evidence::new(["https://a.example", "https://b.example", "https://c.example"])?,
                issued_by: "senior_ana".to_owned(),
            },
            created_at,
        );

        let value = serde_json::to_value(AuditLogEntryResponse::from(entry))
            .unwrap_or_default();

        assert_eq!(
            value,
            json!({
                "id": 7,
                "action_type": "ban",
                "target": "mallory",
                "reason": "ban evasion",
                "evidence": ["https://a.example", "https://b.example", "https://c.example"],
                "issued_by": "senior_ana",
                "duration": "14 Days",
                "created_at": "2024-05-01T12:00:00+00:00",
                "handled": false
            })
        );
        Ok(())
    }
}
