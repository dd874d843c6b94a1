pub mod hashing;
pub mod use_cases;

// Re-export for convenience
pub use hashing::{
    HashingConfig, HashingError, compute_credential_hash, verify_credential_hash,
};
pub use use_cases::provision_admin::{ProvisionAdminUseCase, ProvisionError};
