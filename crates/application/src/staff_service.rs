//! Staff directory: login verification and account provisioning.
//!
//! Failed logins never reveal whether the username exists; unknown users
//! still pay for one hash so response times stay comparable.

use std::sync::Arc;

use tracing::{info, warn};
use warden_core::{AppResult, StaffIdentity, StaffRole};
use warden_domain::{normalize_username, validate_password};

use crate::{PasswordHasher, StaffAccount, StaffAccountRepository};

/// Application service over the staff directory.
#[derive(Clone)]
pub struct StaffService {
    accounts: Arc<dyn StaffAccountRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl StaffService {
    /// Creates a new staff service.
    #[must_use]
    pub fn new(
        accounts: Arc<dyn StaffAccountRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            accounts,
            password_hasher,
        }
    }

    /// Verifies credentials. Returns `None` for any mismatch.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<Option<StaffIdentity>> {
        let account = self.accounts.find_by_username(username.trim()).await?;

        let Some(account) = account else {
            let _ = self.password_hasher.hash_password(password);
            info!(username = %username.trim(), "login rejected");
            return Ok(None);
        };

        if !self
            .password_hasher
            .verify_password(password, &account.password_hash)?
        {
            warn!(username = %account.username, "login rejected: wrong password");
            return Ok(None);
        }

        info!(username = %account.username, role = %account.role, "staff login");
        Ok(Some(StaffIdentity::new(account.username, account.role)))
    }

    /// Provisions a staff account. Used by the operator command line.
    pub async fn create_account(
        &self,
        username: &str,
        password: &str,
        role: StaffRole,
    ) -> AppResult<StaffIdentity> {
        let username = normalize_username(username)?;
        validate_password(password)?;
        let password_hash = self.password_hasher.hash_password(password)?;

        self.accounts
            .create(StaffAccount {
                username: username.clone(),
                password_hash,
                role,
            })
            .await?;

        info!(username = %username, role = %role, "staff account created");
        Ok(StaffIdentity::new(username, role))
    }
}
