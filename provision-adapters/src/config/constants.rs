pub mod env {
    pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
    /// Prefix for structured overrides, e.g.
    /// `PROVISIONER_POLICY__MIN_PASSWORD_LENGTH=8`.
    pub const SETTINGS_PREFIX: &str = "PROVISIONER";
}

/// Optional settings file next to the binary (`provisioner.json`).
pub const SETTINGS_FILE: &str = "provisioner";

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
