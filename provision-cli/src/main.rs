use clap::Parser;
use color_eyre::eyre::Result;
use secrecy::{ExposeSecret, Secret};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use provision_adapters::{PostgresAccountStore, ProvisionerSettings, get_postgres_pool};
use provision_application::{ProvisionAdminUseCase, ProvisionError};
use provision_core::Candidate;

/// Provision an administrator account directly against the account store.
///
/// For operators, when self-service signup is disabled or unavailable.
/// The same credential policy and uniqueness rules as signup apply.
#[derive(Parser)]
#[command(name = "create-admin", version)]
struct Args {
    /// Email address of the new administrator
    email: String,
    /// Username, 3-20 characters: letters, digits, underscore, hyphen
    username: String,
    /// Password; checked against the configured policy, stored only as a hash
    password: String,
}

// Exit codes for scripted callers
const EXIT_POLICY_VIOLATION: i32 = 2;
const EXIT_CONFLICT: i32 = 3;
const EXIT_STORE_UNAVAILABLE: i32 = 4;
const EXIT_SCHEMA_MISSING: i32 = 5;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;
    init_tracing()?;

    let args = Args::parse();
    let candidate = Candidate::new(args.email, args.username, Secret::from(args.password));

    let settings = ProvisionerSettings::load()?;

    let pool = match get_postgres_pool(
        settings.postgres.url.expose_secret(),
        settings.postgres.max_connections,
    )
    .await
    {
        Ok(pool) => pool,
        Err(error) => {
            eprintln!("Error: account store is unreachable: {error}");
            eprintln!("Hint: check DATABASE_URL and that PostgreSQL is running");
            std::process::exit(EXIT_STORE_UNAVAILABLE);
        }
    };

    let account_store = PostgresAccountStore::new(pool.clone());
    let use_case = ProvisionAdminUseCase::new(
        &account_store,
        settings.password_policy(),
        settings.hashing_config(),
    );

    let outcome = use_case.execute(candidate).await;
    pool.close().await;

    match outcome {
        Ok(account) => {
            tracing::info!(account_id = %account.id, "Admin account created");
            println!("{}", serde_json::to_string_pretty(&account)?);
            Ok(())
        }
        Err(error) => {
            report(&error);
            std::process::exit(exit_code(&error));
        }
    }
}

fn report(error: &ProvisionError) {
    tracing::error!(%error, "Provisioning failed");
    eprintln!("Error: {error}");
    if matches!(error, ProvisionError::SchemaMissing) {
        eprintln!("Hint: apply the bundled migration: sqlx migrate run --source migrations");
    }
}

fn exit_code(error: &ProvisionError) -> i32 {
    match error {
        ProvisionError::Policy(_) => EXIT_POLICY_VIOLATION,
        ProvisionError::EmailTaken | ProvisionError::UsernameTaken => EXIT_CONFLICT,
        ProvisionError::StoreUnavailable(_) => EXIT_STORE_UNAVAILABLE,
        ProvisionError::SchemaMissing => EXIT_SCHEMA_MISSING,
        ProvisionError::Hashing(_) | ProvisionError::StoreError(_) => 1,
    }
}

fn init_tracing() -> Result<()> {
    let fmt_layer = fmt::layer().compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
