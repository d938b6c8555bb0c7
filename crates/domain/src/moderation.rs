use std::str::FromStr;

use serde::{Deserialize, Serialize};
use warden_core::{AppError, AppResult};

/// Kind of punishment issued against a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    /// Formal warning.
    Warn,
    /// Removal from the current game session.
    Kick,
    /// Ban for a fixed or permanent duration.
    Ban,
}

impl ActionType {
    /// Returns a stable storage value for this action type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Kick => "kick",
            Self::Ban => "ban",
        }
    }

    /// Returns all action types, mildest first.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Warn, Self::Kick, Self::Ban]
    }
}

impl FromStr for ActionType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "warn" => Ok(Self::Warn),
            "kick" => Ok(Self::Kick),
            "ban" => Ok(Self::Ban),
            _ => Err(AppError::Validation(format!(
                "unknown action type '{value}'"
            ))),
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Fixed set of ban lengths offered to staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BanDuration {
    /// One day.
    OneDay,
    /// Three days.
    ThreeDays,
    /// Ten days.
    TenDays,
    /// Fourteen days.
    FourteenDays,
    /// Never expires.
    Permanent,
    /// No duration; the ban is enforced once and lifted immediately.
    Immediate,
}

impl BanDuration {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneDay => "1_day",
            Self::ThreeDays => "3_days",
            Self::TenDays => "10_days",
            Self::FourteenDays => "14_days",
            Self::Permanent => "permanent",
            Self::Immediate => "immediate",
        }
    }

    /// Returns the label shown on the dashboard.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::OneDay => "1 Day",
            Self::ThreeDays => "3 Days",
            Self::TenDays => "10 Days",
            Self::FourteenDays => "14 Days",
            Self::Permanent => "Permanent",
            Self::Immediate => "None",
        }
    }

    /// Returns the ban length in days, or `None` when the ban has no end
    /// date to enforce.
    #[must_use]
    pub fn days(&self) -> Option<u32> {
        match self {
            Self::OneDay => Some(1),
            Self::ThreeDays => Some(3),
            Self::TenDays => Some(10),
            Self::FourteenDays => Some(14),
            Self::Permanent | Self::Immediate => None,
        }
    }
}

impl FromStr for BanDuration {
    type Err = AppError;

    /// Accepts both storage values and dashboard labels.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(' ', "_");
        match normalized.as_str() {
            "1_day" => Ok(Self::OneDay),
            "3_days" => Ok(Self::ThreeDays),
            "10_days" => Ok(Self::TenDays),
            "14_days" => Ok(Self::FourteenDays),
            "permanent" => Ok(Self::Permanent),
            "immediate" | "none" => Ok(Self::Immediate),
            _ => Err(AppError::Validation(format!(
                "unknown ban duration '{value}'"
            ))),
        }
    }
}

impl TryFrom<String> for BanDuration {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(value.as_str())
    }
}

impl From<BanDuration> for String {
    fn from(value: BanDuration) -> Self {
        value.label().to_owned()
    }
}

/// A punishment with its type-specific payload.
///
/// Only bans carry a duration, so the duration-iff-ban invariant holds by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModerationAction {
    /// Formal warning.
    Warn,
    /// Removal from the current game session.
    Kick,
    /// Ban with its duration.
    Ban(BanDuration),
}

impl ModerationAction {
    /// Combines a flat action type and optional duration, rejecting
    /// mismatches.
    pub fn from_parts(action_type: ActionType, duration: Option<BanDuration>) -> AppResult<Self> {
        match (action_type, duration) {
            (ActionType::Warn, None) => Ok(Self::Warn),
            (ActionType::Kick, None) => Ok(Self::Kick),
            (ActionType::Ban, Some(duration)) => Ok(Self::Ban(duration)),
            (ActionType::Ban, None) => Err(AppError::Validation(
                "ban actions require a duration".to_owned(),
            )),
            (other, Some(_)) => Err(AppError::Validation(format!(
                "{other} actions must not carry a duration"
            ))),
        }
    }

    /// Returns the flat action type.
    #[must_use]
    pub fn action_type(&self) -> ActionType {
        match self {
            Self::Warn => ActionType::Warn,
            Self::Kick => ActionType::Kick,
            Self::Ban(_) => ActionType::Ban,
        }
    }

    /// Returns the ban duration, present only for bans.
    #[must_use]
    pub fn duration(&self) -> Option<BanDuration> {
        match self {
            Self::Ban(duration) => Some(*duration),
            Self::Warn | Self::Kick => None,
        }
    }
}
