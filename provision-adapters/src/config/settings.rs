use config::{Config, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;

use provision_application::HashingConfig;
use provision_core::{DEFAULT_MIN_PASSWORD_LENGTH, PasswordPolicy};

use super::constants::{
    DEFAULT_MAX_CONNECTIONS, SETTINGS_FILE,
    env::{DATABASE_URL_ENV_VAR, SETTINGS_PREFIX},
};

#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionerSettings {
    pub postgres: PostgresSettings,
    #[serde(default)]
    pub policy: PolicySettings,
    #[serde(default)]
    pub hashing: HashingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    pub min_password_length: usize,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HashingSettings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingSettings {
    fn default() -> Self {
        let config = HashingConfig::default();
        Self {
            memory_kib: config.memory_kib,
            iterations: config.iterations,
            parallelism: config.parallelism,
        }
    }
}

impl ProvisionerSettings {
    /// Layered load: optional `provisioner.json`, then
    /// `PROVISIONER_`-prefixed environment variables (`__` separates
    /// nesting levels). `DATABASE_URL` is honored directly since that is
    /// what operators usually have exported already.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name(SETTINGS_FILE).required(false))
            .add_source(
                Environment::with_prefix(SETTINGS_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        if let Ok(url) = std::env::var(DATABASE_URL_ENV_VAR) {
            builder = builder.set_override("postgres.url", url)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        PasswordPolicy::new(self.policy.min_password_length)
    }

    pub fn hashing_config(&self) -> HashingConfig {
        HashingConfig {
            memory_kib: self.hashing.memory_kib,
            iterations: self.hashing.iterations,
            parallelism: self.hashing.parallelism,
        }
    }
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}
