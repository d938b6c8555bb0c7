use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use warden_application::BanRequestRepository;
use warden_core::{AppError, AppResult, NonEmptyString};
use warden_domain::{
    BanDuration, BanRequest, BanRequestId, BanRequestReview, BanRequestStatus, Evidence,
    NewBanRequest,
};

/// PostgreSQL-backed ban request store.
#[derive(Clone)]
pub struct PostgresBanRequestRepository {
    pool: PgPool,
}

impl PostgresBanRequestRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const REQUEST_COLUMNS: &str = r#"
    id,
    target,
    reason,
    evidence_1,
    evidence_2,
    evidence_3,
    duration,
    requested_by,
    status,
    reviewed_by,
    reviewed_at,
    created_at
"#;

#[derive(Debug, FromRow)]
struct BanRequestRow {
    id: i64,
    target: String,
    reason: String,
    evidence_1: String,
    evidence_2: String,
    evidence_3: String,
    duration: String,
    requested_by: String,
    status: String,
    reviewed_by: Option<String>,
    reviewed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<BanRequestRow> for BanRequest {
    type Error = AppError;

    fn try_from(row: BanRequestRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt =
            move |error: AppError| AppError::Internal(format!("ban request row {id} is invalid: {error}"));

        let request = NewBanRequest {
            target: NonEmptyString::new(row.target).map_err(corrupt)?,
            reason: NonEmptyString::new(row.reason).map_err(corrupt)?,
            evidence: Evidence::new([row.evidence_1, row.evidence_2, row.evidence_3])
                .map_err(corrupt)?,
            duration: row.duration.parse::<BanDuration>().map_err(corrupt)?,
            requested_by: row.requested_by,
        };

        let status = row.status.parse::<BanRequestStatus>().map_err(corrupt)?;
        let review = match (status, row.reviewed_by, row.reviewed_at) {
            (BanRequestStatus::Pending, _, _) => None,
            (status, Some(reviewed_by), Some(reviewed_at)) => Some(BanRequestReview {
                status,
                reviewed_by,
                reviewed_at,
            }),
            (status, _, _) => {
                return Err(AppError::Internal(format!(
                    "ban request row {id} is {} without reviewer details",
                    status.as_str()
                )));
            }
        };

        Ok(BanRequest::new(BanRequestId::new(id), request, row.created_at).with_review(review))
    }
}

fn into_requests(rows: Vec<BanRequestRow>) -> AppResult<Vec<BanRequest>> {
    rows.into_iter().map(BanRequest::try_from).collect()
}

#[async_trait]
impl BanRequestRepository for PostgresBanRequestRepository {
    async fn append_request(&self, request: NewBanRequest) -> AppResult<BanRequest> {
        let [evidence_1, evidence_2, evidence_3] = request.evidence.links();
        let row = sqlx::query_as::<_, BanRequestRow>(&format!(
            r#"
            INSERT INTO ban_requests (
                target,
                reason,
                evidence_1,
                evidence_2,
                evidence_3,
                duration,
                requested_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(request.target.as_str())
        .bind(request.reason.as_str())
        .bind(evidence_1)
        .bind(evidence_2)
        .bind(evidence_3)
        .bind(request.duration.as_str())
        .bind(request.requested_by.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::StoreUnavailable(format!("failed to append ban request: {error}"))
        })?;

        BanRequest::try_from(row)
    }

    async fn list_requests(&self, status: Option<BanRequestStatus>) -> AppResult<Vec<BanRequest>> {
        let rows = sqlx::query_as::<_, BanRequestRow>(&format!(
            r#"
            SELECT {REQUEST_COLUMNS}
            FROM ban_requests
            WHERE ($1::TEXT IS NULL OR status = $1)
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(status.map(|status| status.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::StoreUnavailable(format!("failed to list ban requests: {error}"))
        })?;

        into_requests(rows)
    }

    async fn list_requests_for_requester(&self, username: &str) -> AppResult<Vec<BanRequest>> {
        let rows = sqlx::query_as::<_, BanRequestRow>(&format!(
            r#"
            SELECT {REQUEST_COLUMNS}
            FROM ban_requests
            WHERE requested_by = $1
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::StoreUnavailable(format!(
                "failed to list ban requests filed by '{username}': {error}"
            ))
        })?;

        into_requests(rows)
    }

    async fn find_request(&self, id: BanRequestId) -> AppResult<Option<BanRequest>> {
        let row = sqlx::query_as::<_, BanRequestRow>(&format!(
            r#"
            SELECT {REQUEST_COLUMNS}
            FROM ban_requests
            WHERE id = $1
            "#
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::StoreUnavailable(format!("failed to find ban request {id}: {error}"))
        })?;

        row.map(BanRequest::try_from).transpose()
    }

    async fn set_status(
        &self,
        id: BanRequestId,
        review: BanRequestReview,
    ) -> AppResult<BanRequest> {
        BanRequestStatus::Pending.ensure_transition(review.status)?;

        // Conditional on `pending` so concurrent reviewers get one winner.
        let updated = sqlx::query_as::<_, BanRequestRow>(&format!(
            r#"
            UPDATE ban_requests
            SET status = $2,
                reviewed_by = $3,
                reviewed_at = $4
            WHERE id = $1
                AND status = 'pending'
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(id.as_i64())
        .bind(review.status.as_str())
        .bind(review.reviewed_by.as_str())
        .bind(review.reviewed_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::StoreUnavailable(format!(
                "failed to update status of ban request {id}: {error}"
            ))
        })?;

        if let Some(row) = updated {
            return BanRequest::try_from(row);
        }

        match self.find_request(id).await? {
            Some(current) => {
                current.status().ensure_transition(review.status)?;
                Err(AppError::InvalidTransition(format!(
                    "ban request {id} is no longer pending"
                )))
            }
            None => Err(AppError::NotFound(format!(
                "ban request {id} does not exist"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;
    use sqlx::postgres::PgPoolOptions;
    use warden_application::BanRequestRepository;
    use warden_core::{AppError, AppResult, NonEmptyString};
    use warden_domain::{
        BanDuration, BanRequestId, BanRequestReview, BanRequestStatus, Evidence, NewBanRequest,
    };

    use super::PostgresBanRequestRepository;
    use crate::MIGRATOR;

    async fn test_pool() -> Option<PgPool> {
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            return None;
        };

        let pool = match PgPoolOptions::new()
            .max_connections(4)
            .connect(database_url.as_str())
            .await
        {
            Ok(pool) => pool,
            Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
        };

        if let Err(error) = MIGRATOR.run(&pool).await {
            panic!("failed to run migrations for postgres ban request tests: {error}");
        }

        Some(pool)
    }

    fn new_request(requested_by: &str) -> AppResult<NewBanRequest> {
        Ok(NewBanRequest {
            target: NonEmptyString::new("Bob")?,
            reason: NonEmptyString::new("aimbot")?,
            evidence: Evidence::new(["https://a.example", "https://b.example", "https://c.example"])?,
            duration: BanDuration::ThreeDays,
            requested_by: requested_by.to_owned(),
        })
    }

    fn review(status: BanRequestStatus, reviewer: &str) -> BanRequestReview {
        BanRequestReview {
            status,
            reviewed_by: reviewer.to_owned(),
            reviewed_at: chrono::Utc::now(),
        }
    }

    fn unique_requester() -> String {
        format!(
            "helper-{}",
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        )
    }

    #[tokio::test]
    async fn set_status_is_single_use() -> AppResult<()> {
        let Some(pool) = test_pool().await else {
            return Ok(());
        };

        let repository = PostgresBanRequestRepository::new(pool);
        let requester = unique_requester();
        let request = repository.append_request(new_request(&requester)?).await?;
        assert_eq!(request.status(), BanRequestStatus::Pending);
        assert_eq!(request.reviewed_by(), None);

        let approved = repository
            .set_status(request.id(), review(BanRequestStatus::Approved, "senior_ana"))
            .await?;
        assert_eq!(approved.status(), BanRequestStatus::Approved);
        assert_eq!(approved.reviewed_by(), Some("senior_ana"));
        assert!(approved.reviewed_at().is_some());

        let again = repository
            .set_status(request.id(), review(BanRequestStatus::Denied, "senior_bo"))
            .await;
        assert!(matches!(again, Err(AppError::InvalidTransition(_))));

        let missing = repository
            .set_status(BanRequestId::new(i64::MAX), review(BanRequestStatus::Denied, "x"))
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));

        let own = repository.list_requests_for_requester(&requester).await?;
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].status(), BanRequestStatus::Approved);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_reviews_have_one_winner() -> AppResult<()> {
        let Some(pool) = test_pool().await else {
            return Ok(());
        };

        let repository = PostgresBanRequestRepository::new(pool);
        let request = repository
            .append_request(new_request(&unique_requester())?)
            .await?;

        let (first, second) = tokio::join!(
            repository.set_status(request.id(), review(BanRequestStatus::Approved, "senior_a")),
            repository.set_status(request.id(), review(BanRequestStatus::Approved, "senior_b")),
        );

        let winners = [first.is_ok(), second.is_ok()]
            .into_iter()
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
        assert!(
            matches!(first, Err(AppError::InvalidTransition(_)))
                || matches!(second, Err(AppError::InvalidTransition(_)))
        );

        let pending = repository
            .list_requests(Some(BanRequestStatus::Pending))
            .await?;
        assert!(pending.iter().all(|pending| pending.id() != request.id()));
        Ok(())
    }
}
