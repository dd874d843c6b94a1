pub mod hashmap_account_store;
pub mod postgres_account_store;

pub use hashmap_account_store::HashMapAccountStore;
pub use postgres_account_store::PostgresAccountStore;

use sqlx::{PgPool, postgres::PgPoolOptions};

/// Create a PostgreSQL connection pool
///
/// # Arguments
/// * `url` - Database connection URL
/// * `max_connections` - Upper bound on pooled connections
///
/// # Returns
/// Result containing the PgPool or an error
pub async fn get_postgres_pool(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}
