pub mod provision_admin;

// Re-export for convenience
pub use provision_admin::{ProvisionAdminUseCase, ProvisionError};
