use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::policy::PolicyViolation;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// A syntactically valid email address, normalized to lower case at parse
/// time so equality doubles as the uniqueness comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, PolicyViolation> {
        if !EMAIL_PATTERN.is_match(raw) {
            return Err(PolicyViolation::InvalidEmailFormat);
        }
        Ok(Self(raw.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
