use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher, SaltString, rand_core},
};
use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

use provision_core::Password;

/// Work factor of the credential hash. Tunable per deployment profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: 15000,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Error)]
#[error("Failed to derive credential hash: {0}")]
pub struct HashingError(pub String);

/// Derives a salted, one-way credential hash from the plaintext secret.
///
/// The secret moves into a blocking task (hashing is intentionally
/// CPU-expensive) and is dropped there. The salt is freshly generated per
/// call, so hashing the same secret twice yields two distinct strings.
#[tracing::instrument(name = "Computing credential hash", skip_all)]
pub async fn compute_credential_hash(
    secret: Password,
    config: HashingConfig,
) -> Result<Secret<String>, HashingError> {
    let current_span: tracing::Span = tracing::Span::current();

    let result = tokio::task::spawn_blocking(move || {
        current_span.in_scope(move || {
            let salt: SaltString = SaltString::generate(rand_core::OsRng);
            let hasher = Argon2::new(
                Algorithm::Argon2id,
                Version::V0x13,
                Params::new(config.memory_kib, config.iterations, config.parallelism, None)
                    .map_err(|e| HashingError(e.to_string()))?,
            );
            hasher
                .hash_password(secret.as_ref().expose_secret().as_bytes(), &salt)
                .map(|h| Secret::from(h.to_string()))
                .map_err(|e| HashingError(e.to_string()))
        })
    })
    .await
    .map_err(|e| HashingError(e.to_string()))?;

    result
}

/// Checks a plaintext secret against a stored PHC hash string. The
/// provisioning pipeline never calls this itself; it is the contract the
/// login path relies on, and the tests exercise it.
#[tracing::instrument(name = "Verifying credential hash", skip_all)]
pub async fn verify_credential_hash(
    expected_hash: Secret<String>,
    candidate: Password,
) -> Result<(), HashingError> {
    let current_span: tracing::Span = tracing::Span::current();

    let result = tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| {
            // Parameters are read back out of the PHC string
            let expected_hash: PasswordHash<'_> =
                PasswordHash::new(expected_hash.expose_secret())
                    .map_err(|e| HashingError(e.to_string()))?;

            Argon2::default()
                .verify_password(
                    candidate.as_ref().expose_secret().as_bytes(),
                    &expected_hash,
                )
                .map_err(|e| HashingError(e.to_string()))
        })
    })
    .await
    .map_err(|e| HashingError(e.to_string()))?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use provision_core::PasswordPolicy;

    // Low-cost parameters keep the tests fast
    fn test_config() -> HashingConfig {
        HashingConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn password(secret: &str) -> Password {
        Password::parse(Secret::from(secret.to_string()), &PasswordPolicy::new(8)).unwrap()
    }

    #[tokio::test]
    async fn hash_is_not_the_plaintext() {
        let hash = compute_credential_hash(password("SecurePass123!"), test_config())
            .await
            .unwrap();
        assert_ne!(hash.expose_secret(), "SecurePass123!");
        assert!(hash.expose_secret().starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn same_secret_hashes_to_different_strings() {
        let first = compute_credential_hash(password("SecurePass123!"), test_config())
            .await
            .unwrap();
        let second = compute_credential_hash(password("SecurePass123!"), test_config())
            .await
            .unwrap();

        assert_ne!(first.expose_secret(), second.expose_secret());

        verify_credential_hash(first, password("SecurePass123!"))
            .await
            .unwrap();
        verify_credential_hash(second, password("SecurePass123!"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn wrong_secret_fails_verification() {
        let hash = compute_credential_hash(password("SecurePass123!"), test_config())
            .await
            .unwrap();
        let result = verify_credential_hash(hash, password("WrongPass123!")).await;
        assert!(result.is_err());
    }
}
