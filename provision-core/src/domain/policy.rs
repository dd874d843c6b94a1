use thiserror::Error;

/// Characters that count as the "special" class of a secret.
pub const SPECIAL_CHARS: &str = r#"!@#$%^&*(),.?":{}|<>_-+=[]\/"#;

pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 12;

/// Credential policy applied to a candidate's secret. Deployments disagree
/// on the minimum length (8 and 12 are both in use), so it is carried as
/// data rather than hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl PasswordPolicy {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

/// First policy rule a candidate violates. The checks run in a fixed order
/// and short-circuit, so the reported kind is deterministic for any input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("Invalid email format")]
    InvalidEmailFormat,
    #[error("Username may only contain letters, digits, underscores and hyphens")]
    InvalidUsernameFormat,
    #[error("Username must be between 3 and 20 characters")]
    InvalidUsernameLength,
    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),
    #[error("Password must contain at least one uppercase letter")]
    PasswordMissingUppercase,
    #[error("Password must contain at least one lowercase letter")]
    PasswordMissingLowercase,
    #[error("Password must contain at least one digit")]
    PasswordMissingDigit,
    #[error("Password must contain at least one special character")]
    PasswordMissingSpecialChar,
}
