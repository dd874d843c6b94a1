use secrecy::{ExposeSecret, Secret};

use super::policy::{PasswordPolicy, PolicyViolation, SPECIAL_CHARS};

/// A plaintext secret that satisfied every credential rule. Wrapped in
/// [`Secret`] so it never shows up in logs or debug output; the hashing
/// step consumes it and drops the plaintext.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl Password {
    /// Rules run in a fixed order: length, uppercase, lowercase, digit,
    /// special character. The first failing rule is reported.
    pub fn parse(raw: Secret<String>, policy: &PasswordPolicy) -> Result<Self, PolicyViolation> {
        let secret = raw.expose_secret();
        if secret.chars().count() < policy.min_length {
            return Err(PolicyViolation::PasswordTooShort(policy.min_length));
        }
        if !secret.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(PolicyViolation::PasswordMissingUppercase);
        }
        if !secret.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(PolicyViolation::PasswordMissingLowercase);
        }
        if !secret.chars().any(|c| c.is_ascii_digit()) {
            return Err(PolicyViolation::PasswordMissingDigit);
        }
        if !secret.chars().any(|c| SPECIAL_CHARS.contains(c)) {
            return Err(PolicyViolation::PasswordMissingSpecialChar);
        }
        Ok(Self(raw))
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
