use std::fmt;

use super::policy::PolicyViolation;

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 20;

/// An account handle. Display casing is preserved; uniqueness comparisons
/// go through [`Username::normalized`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Charset is checked before length so the reported rule is stable.
    pub fn parse(raw: &str) -> Result<Self, PolicyViolation> {
        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(PolicyViolation::InvalidUsernameFormat);
        }
        if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&raw.len()) {
            return Err(PolicyViolation::InvalidUsernameLength);
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased form used for uniqueness arbitration.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
