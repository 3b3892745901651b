//! Warden CLI - administrative tasks for the auth service
//!
//! Usage:
//!   warden-cli apikey:generate web_backend
//!   warden-cli jwt:generate-secret
//!
//! Environment variables:
//!   DATABASE_URL - PostgreSQL URL (required for apikey:generate)
//!   RUST_LOG - log filter (default: warn)

use base64::{engine::general_purpose::STANDARD, Engine};
use clap::{Parser, Subcommand};
use rand::RngCore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use warden_auth_core::SecretPolicy;
use warden_db::{ApiKeyRepository, CreateApiKey, Repositories};
use warden_types::{ApiKey, Application};

/// Random bytes drawn for a new signing secret
const SECRET_BYTES: usize = 32;

#[derive(Parser, Debug)]
#[command(name = "warden-cli")]
#[command(about = "Administrative commands for the Warden auth service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Provision a new API key and print it once
    #[command(name = "apikey:generate")]
    ApiKeyGenerate {
        /// Application the key is issued for (web_backend or web_frontend)
        application: Application,

        /// PostgreSQL URL
        #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
        database_url: String,
    },

    /// Print a fresh random JWT signing secret
    #[command(name = "jwt:generate-secret")]
    JwtGenerateSecret,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match Cli::parse().command {
        Command::ApiKeyGenerate {
            application,
            database_url,
        } => {
            let value = generate_api_key(application, &database_url).await?;
            println!("{value}");
        }
        Command::JwtGenerateSecret => {
            println!("{}", generate_secret()?);
        }
    }

    Ok(())
}

async fn generate_api_key(
    application: Application,
    database_url: &str,
) -> anyhow::Result<String> {
    let pool = warden_db::create_pool(database_url).await?;
    let repos = Repositories::new(pool);

    let key = ApiKey::generate(application);
    repos
        .api_keys
        .create(CreateApiKey {
            id: key.id.0,
            value: key.value.clone(),
            application: application.as_str().to_string(),
        })
        .await?;

    tracing::info!(key_id = %key.id, %application, "API key provisioned");
    Ok(key.value)
}

/// Base64 of 32 random bytes. The printed text itself is the secret, so it
/// is checked against the policy as text.
fn generate_secret() -> anyhow::Result<String> {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);

    let secret = STANDARD.encode(bytes);
    SecretPolicy::default().validate(secret.as_bytes())?;
    Ok(secret)
}
