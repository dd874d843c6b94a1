use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    account::{Account, NewAccount},
    email::Email,
    username::Username,
};

// AccountStore port trait and errors
#[derive(Debug, Error)]
pub enum AccountStoreError {
    #[error("An account with this email already exists")]
    DuplicateEmail,
    #[error("An account with this username already exists")]
    DuplicateUsername,
    #[error("Account store is unreachable: {0}")]
    Unavailable(String),
    #[error("Accounts schema is missing")]
    SchemaMissing,
    #[error("Unexpected store error: {0}")]
    Unexpected(String),
}

impl PartialEq for AccountStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::DuplicateEmail, Self::DuplicateEmail) => true,
            (Self::DuplicateUsername, Self::DuplicateUsername) => true,
            (Self::Unavailable(_), Self::Unavailable(_)) => true,
            (Self::SchemaMissing, Self::SchemaMissing) => true,
            (Self::Unexpected(_), Self::Unexpected(_)) => true,
            _ => false,
        }
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// One read covering both uniqueness dimensions. Implementations
    /// compare the normalized (lower-cased) forms, and when two different
    /// rows match, the email match is the one returned.
    async fn find_by_email_or_username(
        &self,
        email: &Email,
        username: &Username,
    ) -> Result<Option<Account>, AccountStoreError>;

    /// Creates the account, assigning `id` and `created_at`. Must fail
    /// with the matching duplicate error if a concurrent writer won the
    /// race on either unique column; that constraint is the final
    /// authority on uniqueness.
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, AccountStoreError>;
}
