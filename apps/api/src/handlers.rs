use warden_core::AppResult;
use warden_domain::{ActionType, BanDuration, BanRequestStatus};

pub mod ban_requests;
pub mod enforcer;
pub mod health;
pub mod moderation;


fn parse_action_type(value: &str) -> AppResult<ActionType> {
    value.trim().parse()
}

/// Blank and missing durations are both "no duration".
fn parse_optional_duration(value: Option<&str>) -> AppResult<Option<BanDuration>> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::parse)
        .transpose()
}

fn parse_status_filter(value: Option<&str>) -> AppResult<Option<BanRequestStatus>> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::parse)
        .transpose()
}
