use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use warden_core::{AppError, AppResult};
use warden_domain::{ActionType, BanDuration, ModerationAction};

use crate::config::EnforcerConfig;

/// Audit log entry as served by the internal enforcer endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PendingEntry {
    pub id: i64,
    pub action_type: String,
    pub target: String,
    pub reason: String,
    pub issued_by: String,
    pub duration: Option<String>,
}

/// Payload delivered to the game server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameServerCommand {
    pub entry_id: i64,
    pub action: ActionType,
    pub target: String,
    pub reason: String,
    pub issued_by: String,
    /// Set for fixed-length bans only.
    pub ban_days: Option<u32>,
    pub permanent: bool,
}

impl TryFrom<&PendingEntry> for GameServerCommand {
    type Error = AppError;

    fn try_from(entry: &PendingEntry) -> Result<Self, Self::Error> {
        let action_type = entry.action_type.parse::<ActionType>()?;
        let duration = entry
            .duration
            .as_deref()
            .map(str::parse::<BanDuration>)
            .transpose()?;
        let action = ModerationAction::from_parts(action_type, duration)?;
        let duration = action.duration();

        Ok(Self {
            entry_id: entry.id,
            action: action.action_type(),
            target: entry.target.clone(),
            reason: entry.reason.clone(),
            issued_by: entry.issued_by.clone(),
            ban_days: duration.and_then(|duration| duration.days()),
            permanent: duration == Some(BanDuration::Permanent),
        })
    }
}

/// Both ends of the relay: the dashboard queue and the game server.
#[async_trait]
pub trait EnforcementChannel: Send + Sync {
    /// Fetches unhandled entries, oldest first.
    async fn fetch_pending(&self) -> AppResult<Vec<PendingEntry>>;

    /// Applies one command on the game server.
    async fn deliver(&self, command: &GameServerCommand) -> AppResult<()>;

    /// Removes an entry from the pending queue.
    async fn mark_handled(&self, entry_id: i64) -> AppResult<()>;
}

/// Relays one batch in log order and returns how many entries left the
/// queue. Stops at the first delivery failure so later entries are never
/// applied ahead of earlier ones. Entries that cannot become a game server
/// command are marked handled without delivery.
pub async fn relay_batch(channel: &dyn EnforcementChannel) -> AppResult<usize> {
    let pending = channel.fetch_pending().await?;
    let mut processed = 0;

    for entry in &pending {
        match GameServerCommand::try_from(entry) {
            Ok(command) => {
                channel.deliver(&command).await?;
                channel.mark_handled(entry.id).await?;

                info!(
                    entry_id = entry.id,
                    action = %command.action,
                    target = %command.target,
                    "moderation action enforced"
                );
            }
            Err(error) => {
                channel.mark_handled(entry.id).await?;
                warn!(entry_id = entry.id, error = %error, "discarded malformed audit log entry");
            }
        }
        processed += 1;
    }

    Ok(processed)
}

/// HTTP client for the dashboard API and the game server webhook.
pub struct Relay {
    http_client: reqwest::Client,
    config: EnforcerConfig,
}

impl Relay {
    pub fn new(http_client: reqwest::Client, config: EnforcerConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn config(&self) -> &EnforcerConfig {
        &self.config
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.config.shared_secret)
    }
}

#[async_trait]
impl EnforcementChannel for Relay {
    async fn fetch_pending(&self) -> AppResult<Vec<PendingEntry>> {
        let endpoint = format!(
            "{}/api/internal/enforcer/pending?limit={}",
            self.config.api_base_url, self.config.batch_limit
        );
        let response = self
            .http_client
            .get(endpoint)
            .header(header::AUTHORIZATION, self.bearer())
            .send()
            .await
            .map_err(|error| {
                AppError::StoreUnavailable(format!("failed to call pending endpoint: {error}"))
            })?;

        let response = ensure_success(response, "pending endpoint").await?;
        response.json::<Vec<PendingEntry>>().await.map_err(|error| {
            AppError::Internal(format!("failed to parse pending endpoint response: {error}"))
        })
    }

    async fn deliver(&self, command: &GameServerCommand) -> AppResult<()> {
        let response = self
            .http_client
            .post(self.config.webhook_url.clone())
            .json(command)
            .send()
            .await
            .map_err(|error| {
                AppError::StoreUnavailable(format!("failed to call game server webhook: {error}"))
            })?;

        ensure_success(response, "game server webhook").await?;
        Ok(())
    }

    async fn mark_handled(&self, entry_id: i64) -> AppResult<()> {
        let endpoint = format!(
            "{}/api/internal/enforcer/logs/{entry_id}/handled",
            self.config.api_base_url
        );
        let response = self
            .http_client
            .post(endpoint)
            .header(header::AUTHORIZATION, self.bearer())
            .send()
            .await
            .map_err(|error| {
                AppError::StoreUnavailable(format!("failed to call handled endpoint: {error}"))
            })?;

        ensure_success(response, "handled endpoint").await?;
        Ok(())
    }
}

async fn ensure_success(
    response: reqwest::Response,
    endpoint: &str,
) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_owned());
    let message = format!("{endpoint} returned status {}: {body}", status.as_u16());

    if status.is_server_error() {
        Err(AppError::StoreUnavailable(message))
    } else {
        Err(AppError::Internal(message))
    }
}

#[cfg(test)]
mod tests {
    use warden_core::{AppError, AppResult};
    use async_trait::async_trait;
    use tokio::sync::Mutex;
    use warden_domain::ActionType;

    use super::{EnforcementChannel, GameServerCommand, PendingEntry, relay_batch};

    fn entry(action_type: &str, duration: Option<&str>) -> PendingEntry {
        PendingEntry {
            id: 41,
            action_type: action_type.to_owned(),
            target: "mallory".to_owned(),
            reason: "griefing".to_owned(),
            issued_by: "senior_ana".to_owned(),
            duration: duration.map(str::to_owned),
        }
    }

    #[test]
    fn api_payload_deserializes() -> Result<(), serde_json::Error> {
        let parsed: Vec<PendingEntry> = serde_json::from_str(
            r#"[{
                "id": 3,
                "action_type": "ban",
                "target": "mallory",
                "reason": "aimbot",
                "evidence": ["https://a.example", "https://b.example", "https://c.example"],
                "issued_by": "senior_ana",
                "duration": "Permanent",
                "created_at": "2024-05-01T12:00:00+00:00",
                "handled": false
            }]"#,
        )?;

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].duration.as_deref(), Some("Permanent"));
        Ok(())
    }

    #[test]
    fn fixed_ban_carries_days() -> AppResult<()> {
        let command = GameServerCommand::try_from(&entry("ban", Some("10 Days")))?;

        assert_eq!(command.entry_id, 41);
        assert_eq!(command.action, ActionType::Ban);
        assert_eq!(command.ban_days, Some(10));
        assert!(!command.permanent);
        Ok(())
    }

    #[test]
    fn permanent_and_immediate_bans_have_no_days() -> AppResult<()> {
        let permanent = GameServerCommand::try_from(&entry("ban", Some("Permanent")))?;
        assert_eq!(permanent.ban_days, None);
        assert!(permanent.permanent);

        let immediate = GameServerCommand::try_from(&entry("ban", Some("None")))?;
        assert_eq!(immediate.ban_days, None);
        assert!(!immediate.permanent);
        Ok(())
    }

    #[test]
    fn warn_without_duration_converts() -> AppResult<()> {
        let command = GameServerCommand::try_from(&entry("warn", None))?;

        assert_eq!(command.action, ActionType::Warn);
        assert_eq!(command.ban_days, None);
        Ok(())
    }

    #[test]
    fn inconsistent_entries_are_rejected() {
        assert!(matches!(
            GameServerCommand::try_from(&entry("kick", Some("3 Days"))),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            GameServerCommand::try_from(&entry("ban", None)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            GameServerCommand::try_from(&entry("mute", None)),
            Err(AppError::Validation(_))
        ));
    }

    #[derive(Default)]
    struct FakeChannel {
        pending: Vec<PendingEntry>,
        failing_entry: Option<i64>,
        delivered: Mutex<Vec<i64>>,
        handled: Mutex<Vec<i64>>,
    }

    #[async_trait]
    impl EnforcementChannel for FakeChannel {
        async fn fetch_pending(&self) -> AppResult<Vec<PendingEntry>> {
            Ok(self.pending.clone())
        }

        async fn deliver(&self, command: &GameServerCommand) -> AppResult<()> {
            if self.failing_entry == Some(command.entry_id) {
                return Err(AppError::StoreUnavailable("game server offline".to_owned()));
            }
            self.delivered.lock().await.push(command.entry_id);
            Ok(())
        }

        async fn mark_handled(&self, entry_id: i64) -> AppResult<()> {
            self.handled.lock().await.push(entry_id);
            Ok(())
        }
    }

    fn entry_with_id(id: i64, action_type: &str) -> PendingEntry {
        PendingEntry {
            id,
            ..entry(action_type, None)
        }
    }

    #[tokio::test]
    async fn malformed_entries_leave_the_queue_without_delivery() -> AppResult<()> {
        let channel = FakeChannel {
            pending: vec![
                entry_with_id(1, "warn"),
                entry_with_id(2, "mute"),
                entry_with_id(3, "kick"),
            ],
            ..FakeChannel::default()
        };

        let processed = relay_batch(&channel).await?;

        assert_eq!(processed, 3);
        assert_eq!(*channel.delivered.lock().await, vec![1, 3]);
        assert_eq!(*channel.handled.lock().await, vec![1, 2, 3]);
        Ok(())
    }

    #[tokio::test]
    async fn delivery_failure_stops_the_batch_in_order() {
        let channel = FakeChannel {
            pending: vec![
                entry_with_id(1, "warn"),
                entry_with_id(2, "kick"),
                entry_with_id(3, "warn"),
            ],
            failing_entry: Some(2),
            ..FakeChannel::default()
        };

        let result = relay_batch(&channel).await;

        assert!(matches!(result, Err(AppError::StoreUnavailable(_))));
        assert_eq!(*channel.delivered.lock().await, vec![1]);
        assert_eq!(*channel.handled.lock().await, vec![1]);
    }
}
