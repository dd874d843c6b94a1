use provision_core::{
    Account, AccountRole, AccountStore, AccountStoreError, Candidate, NewAccount, PasswordPolicy,
    PolicyViolation, ProvisionedAccount, ValidatedCandidate,
};

use crate::hashing::{HashingConfig, HashingError, compute_credential_hash};

/// Error types for the admin provisioning use case
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error(transparent)]
    Policy(#[from] PolicyViolation),
    #[error("An account with this email already exists")]
    EmailTaken,
    #[error("An account with this username already exists")]
    UsernameTaken,
    #[error(transparent)]
    Hashing(#[from] HashingError),
    #[error("Account store is unreachable: {0}")]
    StoreUnavailable(String),
    #[error("Accounts schema is missing")]
    SchemaMissing,
    #[error("Unexpected store error: {0}")]
    StoreError(String),
}

impl From<AccountStoreError> for ProvisionError {
    fn from(error: AccountStoreError) -> Self {
        match error {
            AccountStoreError::DuplicateEmail => ProvisionError::EmailTaken,
            AccountStoreError::DuplicateUsername => ProvisionError::UsernameTaken,
            AccountStoreError::Unavailable(cause) => ProvisionError::StoreUnavailable(cause),
            AccountStoreError::SchemaMissing => ProvisionError::SchemaMissing,
            AccountStoreError::Unexpected(cause) => ProvisionError::StoreError(cause),
        }
    }
}

/// Provision admin use case - creates a privileged account directly
/// against the account store, enforcing the same policy and uniqueness
/// rules as the signup path.
pub struct ProvisionAdminUseCase<'a, S>
where
    S: AccountStore,
{
    account_store: &'a S,
    policy: PasswordPolicy,
    hashing: HashingConfig,
}

impl<'a, S> ProvisionAdminUseCase<'a, S>
where
    S: AccountStore,
{
    pub fn new(account_store: &'a S, policy: PasswordPolicy, hashing: HashingConfig) -> Self {
        Self {
            account_store,
            policy,
            hashing,
        }
    }

    /// Execute the provisioning pipeline
    ///
    /// Stages run strictly in order: policy checks (no I/O), one
    /// uniqueness read, credential hashing, one create. The create is the
    /// only write and the last step, so a failed attempt never leaves a
    /// half-initialized account behind. A duplicate reported by the store
    /// at write time (a concurrent writer won the race) maps to the same
    /// conflict errors as the read-side check.
    ///
    /// # Returns
    /// The created account's public fields, or the first error
    /// encountered. No retries; an attempt is a single operator action.
    #[tracing::instrument(name = "ProvisionAdminUseCase::execute", skip_all)]
    pub async fn execute(&self, candidate: Candidate) -> Result<ProvisionedAccount, ProvisionError> {
        let candidate = candidate.validate(&self.policy)?;

        if let Some(existing) = self
            .account_store
            .find_by_email_or_username(&candidate.email, &candidate.username)
            .await?
        {
            return Err(classify_conflict(&existing, &candidate));
        }

        let ValidatedCandidate {
            email,
            username,
            secret,
        } = candidate;

        // Hashing only happens once the identity is known to be free
        let credential_hash = compute_credential_hash(secret, self.hashing).await?;

        let account = self
            .account_store
            .create_account(NewAccount {
                email,
                username,
                credential_hash,
                role: AccountRole::Admin,
                is_active: true,
            })
            .await?;

        tracing::info!(account_id = %account.id, "Admin account provisioned");

        Ok(ProvisionedAccount::from(account))
    }
}

/// Email wins when both fields collide so the reported conflict is
/// deterministic.
fn classify_conflict(existing: &Account, candidate: &ValidatedCandidate) -> ProvisionError {
    if existing.email == candidate.email {
        ProvisionError::EmailTaken
    } else {
        ProvisionError::UsernameTaken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use provision_core::{Email, Username};
    use secrecy::Secret;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    enum CreateOutcome {
        Succeed,
        DuplicateEmail,
        DuplicateUsername,
        Unavailable,
        SchemaMissing,
    }

    struct MockAccountStore {
        existing: Option<Account>,
        create_outcome: CreateOutcome,
        finds: AtomicUsize,
        creates: AtomicUsize,
    }

    impl MockAccountStore {
        fn empty() -> Self {
            Self {
                existing: None,
                create_outcome: CreateOutcome::Succeed,
                finds: AtomicUsize::new(0),
                creates: AtomicUsize::new(0),
            }
        }

        fn with_existing(account: Account) -> Self {
            Self {
                existing: Some(account),
                ..Self::empty()
            }
        }

        fn failing_create(outcome: CreateOutcome) -> Self {
            Self {
                create_outcome: outcome,
                ..Self::empty()
            }
        }
    }

    #[async_trait::async_trait]
    impl AccountStore for MockAccountStore {
        async fn find_by_email_or_username(
            &self,
            _email: &Email,
            _username: &Username,
        ) -> Result<Option<Account>, AccountStoreError> {
            self.finds.fetch_add(1, Ordering::SeqCst);
            Ok(self.existing.clone())
        }

        async fn create_account(
            &self,
            new_account: NewAccount,
        ) -> Result<Account, AccountStoreError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            match self.create_outcome {
                CreateOutcome::Succeed => Ok(Account {
                    id: Uuid::new_v4(),
                    email: new_account.email,
                    username: new_account.username,
                    credential_hash: new_account.credential_hash,
                    role: new_account.role,
                    is_active: new_account.is_active,
                    created_at: Utc::now(),
                }),
                CreateOutcome::DuplicateEmail => Err(AccountStoreError::DuplicateEmail),
                CreateOutcome::DuplicateUsername => Err(AccountStoreError::DuplicateUsername),
                CreateOutcome::Unavailable => {
                    Err(AccountStoreError::Unavailable("connection refused".into()))
                }
                CreateOutcome::SchemaMissing => Err(AccountStoreError::SchemaMissing),
            }
        }
    }

    fn candidate(email: &str, username: &str, secret: &str) -> Candidate {
        Candidate::new(email, username, Secret::from(secret.to_string()))
    }

    fn stored_account(email: &str, username: &str) -> Account {
        Account {
            id: Uuid::new_v4(),
            email: Email::parse(email).unwrap(),
            username: Username::parse(username).unwrap(),
            credential_hash: Secret::from("$argon2id$stored".to_string()),
            role: AccountRole::Admin,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn test_hashing() -> HashingConfig {
        HashingConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn use_case(store: &MockAccountStore) -> ProvisionAdminUseCase<'_, MockAccountStore> {
        ProvisionAdminUseCase::new(store, PasswordPolicy::new(8), test_hashing())
    }

    #[tokio::test]
    async fn provisions_admin_account() {
        let store = MockAccountStore::empty();

        let result = use_case(&store)
            .execute(candidate("admin@example.com", "admin", "SecurePass123!"))
            .await
            .unwrap();

        assert_eq!(result.email, "admin@example.com");
        assert_eq!(result.username, "admin");
        assert_eq!(result.role, AccountRole::Admin);
        assert!(result.is_active);
        assert_eq!(store.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn validation_failure_performs_no_store_io() {
        let store = MockAccountStore::empty();

        let result = use_case(&store)
            .execute(candidate("admin@example.com", "admin", "short1!"))
            .await;

        assert!(matches!(
            result,
            Err(ProvisionError::Policy(PolicyViolation::PasswordTooShort(8)))
        ));
        assert_eq!(store.finds.load(Ordering::SeqCst), 0);
        assert_eq!(store.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn email_conflict_is_reported_without_creating() {
        let store =
            MockAccountStore::with_existing(stored_account("admin@example.com", "someoneelse"));

        let result = use_case(&store)
            .execute(candidate("Admin@Example.com", "admin", "SecurePass123!"))
            .await;

        assert!(matches!(result, Err(ProvisionError::EmailTaken)));
        assert_eq!(store.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn username_conflict_is_reported_without_creating() {
        let store = MockAccountStore::with_existing(stored_account("other@example.com", "Admin"));

        let result = use_case(&store)
            .execute(candidate("admin@example.com", "admin", "SecurePass123!"))
            .await;

        assert!(matches!(result, Err(ProvisionError::UsernameTaken)));
        assert_eq!(store.creates.load(Ordering::SeqCst), 0);
    }

    // Below argon2's minimum memory cost; any hashing attempt errors out
    fn unusable_hashing() -> HashingConfig {
        HashingConfig {
            memory_kib: 1,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[tokio::test]
    async fn conflict_short_circuits_before_any_hashing_work() {
        let store = MockAccountStore::with_existing(stored_account("admin@example.com", "admin"));
        let use_case =
            ProvisionAdminUseCase::new(&store, PasswordPolicy::new(8), unusable_hashing());

        let result = use_case
            .execute(candidate("admin@example.com", "other", "SecurePass123!"))
            .await;

        // Had hashing run, this would be ProvisionError::Hashing
        assert!(matches!(result, Err(ProvisionError::EmailTaken)));
        assert_eq!(store.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_work_factor_surfaces_as_hashing_error() {
        let store = MockAccountStore::empty();
        let use_case =
            ProvisionAdminUseCase::new(&store, PasswordPolicy::new(8), unusable_hashing());

        let result = use_case
            .execute(candidate("admin@example.com", "admin", "SecurePass123!"))
            .await;

        assert!(matches!(result, Err(ProvisionError::Hashing(_))));
        assert_eq!(store.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn email_conflict_wins_when_both_fields_collide() {
        let store = MockAccountStore::with_existing(stored_account("admin@example.com", "admin"));

        let result = use_case(&store)
            .execute(candidate("admin@example.com", "admin", "SecurePass123!"))
            .await;

        assert!(matches!(result, Err(ProvisionError::EmailTaken)));
    }

    #[tokio::test]
    async fn write_time_duplicate_maps_to_conflict_error() {
        // The race window: the read saw nothing, the constraint fired
        let store = MockAccountStore::failing_create(CreateOutcome::DuplicateEmail);

        let result = use_case(&store)
            .execute(candidate("admin@example.com", "admin", "SecurePass123!"))
            .await;

        assert!(matches!(result, Err(ProvisionError::EmailTaken)));

        let store = MockAccountStore::failing_create(CreateOutcome::DuplicateUsername);

        let result = use_case(&store)
            .execute(candidate("admin@example.com", "admin", "SecurePass123!"))
            .await;

        assert!(matches!(result, Err(ProvisionError::UsernameTaken)));
    }

    #[tokio::test]
    async fn store_unavailable_surfaces_with_cause() {
        let store = MockAccountStore::failing_create(CreateOutcome::Unavailable);

        let result = use_case(&store)
            .execute(candidate("admin@example.com", "admin", "SecurePass123!"))
            .await;

        match result {
            Err(ProvisionError::StoreUnavailable(cause)) => {
                assert!(cause.contains("connection refused"));
            }
            other => panic!("expected StoreUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_schema_surfaces_as_its_own_kind() {
        let store = MockAccountStore::failing_create(CreateOutcome::SchemaMissing);

        let result = use_case(&store)
            .execute(candidate("admin@example.com", "admin", "SecurePass123!"))
            .await;

        assert!(matches!(result, Err(ProvisionError::SchemaMissing)));
    }
}
