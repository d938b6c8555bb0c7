use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use warden_application::{StaffAccount, StaffAccountRepository};
use warden_core::{AppError, AppResult};

/// In-memory staff directory.
#[derive(Debug, Default)]
pub struct InMemoryStaffAccountRepository {
    accounts: RwLock<HashMap<String, StaffAccount>>,
}

impl InMemoryStaffAccountRepository {
    /// Creates an empty in-memory staff directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StaffAccountRepository for InMemoryStaffAccountRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<StaffAccount>> {
        Ok(self.accounts.read().await.get(username).cloned())
    }

    async fn create(&self, account: StaffAccount) -> AppResult<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.username) {
            return Err(AppError::Validation(format!(
                "username '{}' is already taken",
                account.username
            )));
        }

        accounts.insert(account.username.clone(), account);
        Ok(())
    }
}
