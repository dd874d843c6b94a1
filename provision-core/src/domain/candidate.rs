use secrecy::Secret;

use super::{
    email::Email,
    password::Password,
    policy::{PasswordPolicy, PolicyViolation},
    username::Username,
};

/// Operator-supplied identity and secret awaiting provisioning. Lives only
/// for one attempt and is consumed by validation either way.
#[derive(Debug)]
pub struct Candidate {
    pub email: String,
    pub username: String,
    pub secret: Secret<String>,
}

impl Candidate {
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        secret: Secret<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            secret,
        }
    }

    /// Runs the policy checks in their fixed order and short-circuits on
    /// the first violated rule. Pure; no store access here.
    pub fn validate(self, policy: &PasswordPolicy) -> Result<ValidatedCandidate, PolicyViolation> {
        let email = Email::parse(&self.email)?;
        let username = Username::parse(&self.username)?;
        let secret = Password::parse(self.secret, policy)?;

        Ok(ValidatedCandidate {
            email,
            username,
            secret,
        })
    }
}

/// A candidate that passed every policy check.
#[derive(Debug)]
pub struct ValidatedCandidate {
    pub email: Email,
    pub username: Username,
    pub secret: Password,
}
