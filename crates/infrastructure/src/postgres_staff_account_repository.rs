use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use warden_application::{StaffAccount, StaffAccountRepository};
use warden_core::{AppError, AppResult, StaffRole};

/// PostgreSQL-backed staff directory.
#[derive(Clone)]
pub struct PostgresStaffAccountRepository {
    pool: PgPool,
}

impl PostgresStaffAccountRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct StaffAccountRow {
    username: String,
    password_hash: String,
    role: i16,
}

impl TryFrom<StaffAccountRow> for StaffAccount {
    type Error = AppError;

    fn try_from(row: StaffAccountRow) -> Result<Self, Self::Error> {
        let role = u8::try_from(row.role)
            .map_err(|_| AppError::Validation(format!("role level {} is out of range", row.role)))
            .and_then(StaffRole::from_level)
            .map_err(|error| {
                AppError::Internal(format!(
                    "staff account '{}' has an invalid role: {error}",
                    row.username
                ))
            })?;

        Ok(Self {
            username: row.username,
            password_hash: row.password_hash,
            role,
        })
    }
}

#[async_trait]
impl StaffAccountRepository for PostgresStaffAccountRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<StaffAccount>> {
        let row = sqlx::query_as::<_, StaffAccountRow>(
            r#"
            SELECT username, password_hash, role
            FROM staff_accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::StoreUnavailable(format!("failed to find staff account: {error}"))
        })?;

        row.map(StaffAccount::try_from).transpose()
    }

    async fn create(&self, account: StaffAccount) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO staff_accounts (username, password_hash, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(account.username.as_str())
        .bind(account.password_hash.as_str())
        .bind(i16::from(account.role.level()))
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::StoreUnavailable(format!("failed to create staff account: {error}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::Validation(format!(
                "username '{}' is already taken",
                account.username
            )));
        }

        Ok(())
    }
}
