//! Shared primitives for all Rust crates in Warden.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{StaffIdentity, StaffRole};

/// Result type used across Warden crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
///
/// Surrounding whitespace is removed on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Creates a validated non-empty string, naming the field in the error.
    pub fn for_field(field: &str, value: impl Into<String>) -> AppResult<Self> {
        Self::new(value)
            .map_err(|_| AppError::Validation(format!("{field} must not be empty or whitespace")))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Common application error categories.
///
/// Every variant is reported to the caller with a distinguishable kind; none
/// of them is fatal to the process.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input other than evidence.
    #[error("validation error: {0}")]
    Validation(String),

    /// Evidence list is not exactly three non-empty entries.
    #[error("invalid evidence: {0}")]
    InvalidEvidence(String),

    /// No valid session accompanies the request.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Caller is authenticated but its role is insufficient.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Ban request is no longer pending.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// The storage collaborator failed; the operation may be retried.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns a stable machine-readable label for the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::InvalidEvidence(_) => "invalid_evidence",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::InvalidTransition(_) => "invalid_transition",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::Internal(_) => "internal",
        }
    }

    /// Returns whether the caller may retry the same operation unchanged.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::{AppError, NonEmptyString};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn non_empty_string_trims_surrounding_whitespace() {
        let value = NonEmptyString::new("  Alice ");
        assert_eq!(
            value.map(String::from).unwrap_or_default(),
            "Alice".to_owned()
        );
    }

    #[test]
    fn field_errors_name_the_field() {
        let error = NonEmptyString::for_field("reason", "");
        assert!(matches!(error, Err(AppError::Validation(message)) if message.starts_with("reason")));
    }

    #[test]
    fn only_store_errors_are_retryable() {
        assert!(AppError::StoreUnavailable("timeout".to_owned()).is_retryable());
        assert!(!AppError::InvalidTransition("approved".to_owned()).is_retryable());
        assert_eq!(AppError::InvalidEvidence(String::new()).kind(), "invalid_evidence");
    }
}
