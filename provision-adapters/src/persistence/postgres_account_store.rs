use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use sqlx::{Pool, Postgres, Row, postgres::PgRow};
use uuid::Uuid;

use provision_core::{
    Account, AccountRole, AccountStore, AccountStoreError, Email, NewAccount, Username,
};

pub struct PostgresAccountStore {
    pool: sqlx::PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresAccountStore { pool }
    }
}

#[async_trait::async_trait]
impl AccountStore for PostgresAccountStore {
    #[tracing::instrument(name = "Looking up account in PostgreSQL", skip_all)]
    async fn find_by_email_or_username(
        &self,
        email: &Email,
        username: &Username,
    ) -> Result<Option<Account>, AccountStoreError> {
        // Both comparisons run on the lowered form, matching the unique
        // indexes; the email match is ordered first so it wins when two
        // different rows collide.
        let row = sqlx::query(
            r#"
                SELECT id, email, username, credential_hash, role, is_active, created_at
                FROM accounts
                WHERE lower(email) = $1 OR lower(username) = $2
                ORDER BY (lower(email) = $1) DESC
                LIMIT 1
            "#,
        )
        .bind(email.as_str())
        .bind(username.normalized())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(parse_account_row).transpose()
    }

    #[tracing::instrument(name = "Creating account in PostgreSQL", skip_all)]
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, AccountStoreError> {
        let row = sqlx::query(
            r#"
                INSERT INTO accounts (email, username, credential_hash, role, is_active)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, email, username, credential_hash, role, is_active, created_at
            "#,
        )
        .bind(new_account.email.as_str())
        .bind(new_account.username.as_str())
        .bind(new_account.credential_hash.expose_secret())
        .bind(new_account.role.as_str())
        .bind(new_account.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        parse_account_row(row)
    }
}

fn parse_account_row(row: PgRow) -> Result<Account, AccountStoreError> {
    let id: Uuid = row.try_get("id").map_err(unexpected)?;
    let email: String = row.try_get("email").map_err(unexpected)?;
    let username: String = row.try_get("username").map_err(unexpected)?;
    let credential_hash: String = row.try_get("credential_hash").map_err(unexpected)?;
    let role: String = row.try_get("role").map_err(unexpected)?;
    let is_active: bool = row.try_get("is_active").map_err(unexpected)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(unexpected)?;

    let email = Email::parse(&email)
        .map_err(|e| AccountStoreError::Unexpected(format!("stored email: {e}")))?;
    let username = Username::parse(&username)
        .map_err(|e| AccountStoreError::Unexpected(format!("stored username: {e}")))?;
    let role = AccountRole::parse(&role)
        .ok_or_else(|| AccountStoreError::Unexpected(format!("unknown role '{role}'")))?;

    Ok(Account {
        id,
        email,
        username,
        credential_hash: Secret::from(credential_hash),
        role,
        is_active,
        created_at,
    })
}

fn unexpected(error: sqlx::Error) -> AccountStoreError {
    AccountStoreError::Unexpected(error.to_string())
}

// 23505 unique_violation, 42P01 undefined_table
fn map_sqlx_error(error: sqlx::Error) -> AccountStoreError {
    match &error {
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => match db_err.constraint() {
                Some(name) if name.contains("username") => AccountStoreError::DuplicateUsername,
                _ => AccountStoreError::DuplicateEmail,
            },
            Some("42P01") => AccountStoreError::SchemaMissing,
            _ => AccountStoreError::Unexpected(error.to_string()),
        },
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => AccountStoreError::Unavailable(error.to_string()),
        _ => AccountStoreError::Unexpected(error.to_string()),
    }
}
