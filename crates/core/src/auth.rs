use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Ordinal staff permission level.
///
/// Higher levels carry every capability of the lower ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum StaffRole {
    /// Level 1: may warn directly.
    Helper = 1,
    /// Level 2: may warn and kick directly.
    Moderator = 2,
    /// Level 3: may ban directly and reviews ban requests.
    Senior = 3,
}

impl StaffRole {
    /// Parses a stored or transported permission level.
    pub fn from_level(level: u8) -> AppResult<Self> {
        match level {
            1 => Ok(Self::Helper),
            2 => Ok(Self::Moderator),
            3 => Ok(Self::Senior),
            _ => Err(AppError::Validation(format!(
                "staff role level must be 1, 2 or 3, got {level}"
            ))),
        }
    }

    /// Returns the numeric permission level.
    #[must_use]
    pub fn level(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for StaffRole {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_level(value)
    }
}

impl From<StaffRole> for u8 {
    fn from(value: StaffRole) -> Self {
        value.level()
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.level())
    }
}

/// Staff claims persisted in the authenticated session and passed into every
/// moderation operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffIdentity {
    username: String,
    role: StaffRole,
}

impl StaffIdentity {
    /// Creates staff claims from an authenticated directory entry.
    #[must_use]
    pub fn new(username: impl Into<String>, role: StaffRole) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    /// Returns the staff username.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the staff role.
    #[must_use]
    pub fn role(&self) -> StaffRole {
        self.role
    }
}
