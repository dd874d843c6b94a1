use std::fmt;

use chrono::{DateTime, Utc};
use secrecy::Secret;
use serde::Serialize;
use uuid::Uuid;

use super::{email::Email, username::Username};

/// Privilege level of an account. The provisioning pipeline only ever
/// writes `Admin`; `Standard` exists because the store holds both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountRole {
    Standard,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Standard => "STANDARD",
            AccountRole::Admin => "ADMIN",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "STANDARD" => Some(AccountRole::Standard),
            "ADMIN" => Some(AccountRole::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields handed to the store for creation. `id` and `created_at` are
/// assigned by the store.
#[derive(Debug)]
pub struct NewAccount {
    pub email: Email,
    pub username: Username,
    pub credential_hash: Secret<String>,
    pub role: AccountRole,
    pub is_active: bool,
}

/// A persisted account record as the store returns it.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: Email,
    pub username: Username,
    pub credential_hash: Secret<String>,
    pub role: AccountRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Public projection of a freshly created account. Carries neither the
/// credential hash nor the plaintext secret.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedAccount {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub role: AccountRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for ProvisionedAccount {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email.as_str().to_owned(),
            username: account.username.as_str().to_owned(),
            role: account.role,
            is_active: account.is_active,
            created_at: account.created_at,
        }
    }
}
