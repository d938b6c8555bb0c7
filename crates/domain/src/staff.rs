//! Staff directory validation rules.
//!
//! Passwords follow the NIST SP800-63B length guidance; the dashboard has no
//! second factor, so the stricter minimum applies.

use warden_core::{AppError, AppResult};

/// Minimum staff password length.
pub const PASSWORD_MIN_LENGTH: usize = 10;

/// Maximum password length (bounds Argon2id work per login attempt).
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Maximum username length.
pub const USERNAME_MAX_LENGTH: usize = 64;

/// Validates and normalizes a staff username.
///
/// Usernames are case-sensitive; only surrounding whitespace is removed.
pub fn normalize_username(username: &str) -> AppResult<String> {
    let trimmed = username.trim();

    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "username must not be empty".to_owned(),
        ));
    }

    if trimmed.chars().count() > USERNAME_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "username must not exceed {USERNAME_MAX_LENGTH} characters"
        )));
    }

    if trimmed.chars().any(char::is_whitespace) {
        return Err(AppError::Validation(
            "username must not contain whitespace".to_owned(),
        ));
    }

    Ok(trimmed.to_owned())
}

/// Validates a new staff password.
pub fn validate_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    if is_common_password(password) {
        return Err(AppError::Validation(
            "this password is too common and has appeared in data breaches".to_owned(),
        ));
    }

    Ok(())
}

fn is_common_password(password: &str) -> bool {
    let lowered = password.to_lowercase();
    COMMON_PASSWORDS.iter().any(|entry| *entry == lowered)
}

static COMMON_PASSWORDS: &[&str] = &[
    "1234567890",
    "qwertyuiop",
    "password123",
    "password12",
    "iloveyou123",
    "minecraft1",
    "moderator1",
    "administrator",
    "letmein123",
    "welcome123",
    "0987654321",
    "1q2w3e4r5t",
];
