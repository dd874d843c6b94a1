use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use provision_core::{Account, AccountStore, AccountStoreError, Email, NewAccount, Username};

/// In-memory store with the same uniqueness semantics as the Postgres
/// adapter. Used by tests and by embedders that want the pipeline without
/// a database.
#[derive(Default, Clone)]
pub struct HashMapAccountStore {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl HashMapAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AccountStore for HashMapAccountStore {
    async fn find_by_email_or_username(
        &self,
        email: &Email,
        username: &Username,
    ) -> Result<Option<Account>, AccountStoreError> {
        let accounts = self.accounts.read().await;

        // Email match wins when the two fields collide on different rows
        if let Some(account) = accounts.values().find(|a| a.email == *email) {
            return Ok(Some(account.clone()));
        }
        Ok(accounts
            .values()
            .find(|a| a.username.normalized() == username.normalized())
            .cloned())
    }

    async fn create_account(&self, new_account: NewAccount) -> Result<Account, AccountStoreError> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| a.email == new_account.email) {
            return Err(AccountStoreError::DuplicateEmail);
        }
        if accounts
            .values()
            .any(|a| a.username.normalized() == new_account.username.normalized())
        {
            return Err(AccountStoreError::DuplicateUsername);
        }

        let account = Account {
            id: Uuid::new_v4(),
            email: new_account.email,
            username: new_account.username,
            credential_hash: new_account.credential_hash,
            role: new_account.role,
            is_active: new_account.is_active,
            created_at: Utc::now(),
        };
        accounts.insert(account.id, account.clone());

        Ok(account)
    }
}
