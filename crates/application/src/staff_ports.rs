use async_trait::async_trait;

use warden_core::{AppResult, StaffRole};

/// Staff directory record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffAccount {
    /// Case-sensitive login name.
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Permission level assigned by administrators.
    pub role: StaffRole,
}

/// Repository port for the staff directory.
#[async_trait]
pub trait StaffAccountRepository: Send + Sync {
    /// Finds an account by exact username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<StaffAccount>>;

    /// Creates an account. Fails with `Validation` if the username is taken.
    async fn create(&self, account: StaffAccount) -> AppResult<()>;
}

/// Port for password hashing. Keeps application code free of direct
/// cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
