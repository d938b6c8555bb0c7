//! Argon2id hashing for staff directory passwords.
//!
//! Defaults follow the OWASP password storage recommendation
//! (m=19456 KiB, t=2, p=1).

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use warden_application::PasswordHasher as PasswordHasherPort;
use warden_core::{AppError, AppResult};

const DEFAULT_MEMORY_KIB: u32 = 19_456;
const DEFAULT_ITERATIONS: u32 = 2;

/// Argon2id password hasher.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Creates a hasher with the recommended cost.
    #[must_use]
    pub fn new() -> Self {
        Self::with_cost(DEFAULT_MEMORY_KIB, DEFAULT_ITERATIONS)
            .unwrap_or_else(|_| Self::from_params(Params::default()))
    }

    /// Creates a hasher with an explicit memory (KiB) and iteration cost.
    pub fn with_cost(memory_kib: u32, iterations: u32) -> AppResult<Self> {
        let params = Params::new(memory_kib, iterations, 1, None).map_err(|error| {
            AppError::Validation(format!("invalid argon2 parameters: {error}"))
        })?;
        Ok(Self::from_params(params))
    }

    fn from_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherPort for Argon2PasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|error| AppError::Internal(format!("failed to hash staff password: {error}")))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let stored = PasswordHash::new(hash).map_err(|error| {
            AppError::Internal(format!("stored staff password hash is malformed: {error}"))
        })?;

        match self.argon2.verify_password(password.as_bytes(), &stored) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(AppError::Internal(format!(
                "staff password verification failed: {error}"
            ))),
        }
    }
}
