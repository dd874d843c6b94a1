pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    account::{Account, AccountRole, NewAccount, ProvisionedAccount},
    candidate::{Candidate, ValidatedCandidate},
    email::Email,
    password::Password,
    policy::{PasswordPolicy, PolicyViolation, DEFAULT_MIN_PASSWORD_LENGTH, SPECIAL_CHARS},
    username::Username,
};

pub use ports::repositories::{AccountStore, AccountStoreError};
