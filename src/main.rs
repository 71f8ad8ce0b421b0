//! Warframe inventory CLI.
//!
//! Logs in to the mobile API, prints a short inventory summary, and logs
//! out again. Mostly a demonstration of the library's session lifecycle.

use std::io;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use warframe_api::{ApiError, SessionClient};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_summary(inventory: &serde_json::Map<String, serde_json::Value>) {
    println!("Inventory: {} top-level entries", inventory.len());

    for key in ["RegularCredits", "PremiumCredits"] {
        if let Some(value) = inventory.get(key) {
            println!("  {key}: {value}");
        }
    }

    for (key, value) in inventory {
        if let Some(items) = value.as_array() {
            println!("  {key}: {} items", items.len());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let email = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("WARFRAME_EMAIL").ok())
        .context("usage: warframe-api <email> (or set WARFRAME_EMAIL)")?;

    let password =
        rpassword::prompt_password("Password: ").context("Failed to read password")?;

    let mut client = SessionClient::new(email, &password)?;
    info!(email = client.email(), "Logging in");

    if let Err(err) = client.login().await {
        return match err {
            // Non-fatal: the account has an active session elsewhere and the
            // service refused a second one.
            ApiError::AlreadyLoggedIn => {
                println!("A session is already active for this account; try again later.");
                Ok(())
            }
            ApiError::VersionOutOfDate => {
                Err(err).context("The service no longer accepts this client version")
            }
            other => Err(other).context("Login failed"),
        };
    }

    let inventory = client
        .get_inventory()
        .await
        .context("Failed to fetch inventory")?;
    print_summary(&inventory);

    client.logout().await.context("Logout failed")?;
    info!("Logged out");
    Ok(())
}
