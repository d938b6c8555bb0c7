use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use warden_application::AuditLogRepository;
use warden_core::{AppError, AppResult, NonEmptyString};
use warden_domain::{
    ActionType, AuditLogCorrection, AuditLogEntry, AuditLogEntryId, BanDuration, Evidence,
    ModerationAction, NewAuditLogEntry,
};

/// PostgreSQL-backed audit log.
#[derive(Clone)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ENTRY_COLUMNS: &str = r#"
    id,
    action_type,
    duration,
    target,
    reason,
    evidence_1,
    evidence_2,
    evidence_3,
    issued_by,
    handled,
    created_at
"#;

#[derive(Debug, FromRow)]
struct AuditLogRow {
    id: i64,
    action_type: String,
    duration: Option<String>,
    target: String,
    reason: String,
    evidence_1: String,
    evidence_2: String,
    evidence_3: String,
    issued_by: String,
    handled: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<AuditLogRow> for AuditLogEntry {
    type Error = AppError;

    fn try_from(row: AuditLogRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt =
            move |error: AppError| AppError::Internal(format!("audit log row {id} is invalid: {error}"));

        let action_type = row.action_type.parse::<ActionType>().map_err(corrupt)?;
        let duration = row
            .duration
            .as_deref()
            .map(str::parse::<BanDuration>)
            .transpose()
            .map_err(corrupt)?;

        let entry = NewAuditLogEntry {
            action: ModerationAction::from_parts(action_type, duration).map_err(corrupt)?,
            target: NonEmptyString::new(row.target).map_err(corrupt)?,
            reason: NonEmptyString::new(row.reason).map_err(corrupt)?,
            evidence: Evidence::new([row.evidence_1, row.evidence_2, row.evidence_3])
                .map_err(corrupt)?,
            issued_by: row.issued_by,
        };

        Ok(AuditLogEntry::new(AuditLogEntryId::new(id), entry, row.created_at)
            .with_handled(row.handled))
    }
}

fn into_entries(rows: Vec<AuditLogRow>) -> AppResult<Vec<AuditLogEntry>> {
    rows.into_iter().map(AuditLogEntry::try_from).collect()
}

fn not_found(id: AuditLogEntryId) -> AppError {
    AppError::NotFound(format!("audit log entry {id} does not exist"))
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    async fn append_entry(&self, entry: NewAuditLogEntry) -> AppResult<AuditLogEntry> {
        let [evidence_1, evidence_2, evidence_3] = entry.evidence.links();
        let row = sqlx::query_as::<_, AuditLogRow>(&format!(
            r#"
            INSERT INTO audit_log_entries (
                action_type,
                duration,
                target,
                reason,
                evidence_1,
                evidence_2,
                evidence_3,
                issued_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(entry.action.action_type().as_str())
        .bind(entry.action.duration().map(|duration| duration.as_str()))
        .bind(entry.target.as_str())
        .bind(entry.reason.as_str())
        .bind(evidence_1)
        .bind(evidence_2)
        .bind(evidence_3)
        .bind(entry.issued_by.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::StoreUnavailable(format!("failed to append audit log entry: {error}"))
        })?;

        AuditLogEntry::try_from(row)
    }

    async fn list_entries(&self) -> AppResult<Vec<AuditLogEntry>> {
        let rows = sqlx::query_as::<_, AuditLogRow>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM audit_log_entries
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::StoreUnavailable(format!("failed to list audit log entries: {error}"))
        })?;

        into_entries(rows)
    }

    async fn list_entries_for_target(&self, target: &str) -> AppResult<Vec<AuditLogEntry>> {
        let rows = sqlx::query_as::<_, AuditLogRow>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM audit_log_entries
            WHERE target = $1
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(target)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::StoreUnavailable(format!(
                "failed to list audit log entries for target '{target}': {error}"
            ))
        })?;

        into_entries(rows)
    }

    async fn find_entry(&self, id: AuditLogEntryId) -> AppResult<Option<AuditLogEntry>> {
        let row = sqlx::query_as::<_, AuditLogRow>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM audit_log_entries
            WHERE id = $1
            "#
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::StoreUnavailable(format!("failed to find audit log entry {id}: {error}"))
        })?;

        row.map(AuditLogEntry::try_from).transpose()
    }

    async fn delete_entry(&self, id: AuditLogEntryId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM audit_log_entries WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::StoreUnavailable(format!(
                    "failed to delete audit log entry {id}: {error}"
                ))
            })?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        Ok(())
    }

    async fn update_entry(
        &self,
        id: AuditLogEntryId,
        expected: ActionType,
        correction: AuditLogCorrection,
    ) -> AppResult<AuditLogEntry> {
        let row = sqlx::query_as::<_, AuditLogRow>(&format!(
            r#"
            UPDATE audit_log_entries
            SET action_type = $2,
                duration = $3,
                reason = $4
            WHERE id = $1
              AND action_type = $5
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(id.as_i64())
        .bind(correction.action.action_type().as_str())
        .bind(correction.action.duration().map(|duration| duration.as_str()))
        .bind(correction.reason.as_str())
        .bind(expected.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::StoreUnavailable(format!("failed to update audit log entry {id}: {error}"))
        })?;

        match row {
            Some(row) => AuditLogEntry::try_from(row),
            None => match self.find_entry(id).await? {
                Some(_) => Err(AppError::InvalidTransition(format!(
                    "audit log entry {id} changed while being corrected"
                ))),
                None => Err(not_found(id)),
            },
        }
    }

    async fn mark_handled(&self, id: AuditLogEntryId) -> AppResult<AuditLogEntry> {
        let row = sqlx::query_as::<_, AuditLogRow>(&format!(
            r#"
            UPDATE audit_log_entries
            SET handled = TRUE
            WHERE id = $1
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::StoreUnavailable(format!(
                "failed to mark audit log entry {id} as handled: {error}"
            ))
        })?
        .ok_or_else(|| not_found(id))?;

        AuditLogEntry::try_from(row)
    }

    async fn list_unhandled_entries(&self, limit: usize) -> AppResult<Vec<AuditLogEntry>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, AuditLogRow>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM audit_log_entries
            WHERE NOT handled
            ORDER BY created_at ASC, id ASC
            LIMIT $1
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::StoreUnavailable(format!(
                "failed to list unhandled audit log entries: {error}"
            ))
        })?;

        into_entries(rows)
    }
}
