pub mod config;
pub mod persistence;

// Re-export commonly used types for convenience
pub use config::settings::ProvisionerSettings;
pub use persistence::{HashMapAccountStore, PostgresAccountStore, get_postgres_pool};
