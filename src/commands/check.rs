//! autogas-pin check - Verify Pinata credentials

use super::Settings;
use anyhow::{Context, Result};

pub async fn run(settings: Settings) -> Result<()> {
    let client = settings.pinata_client()?;

    println!("Checking Pinata credentials against {}...", settings.config.pinata.api_url);
    let message = client
        .test_authentication()
        .await
        .context("Pinata rejected the credentials")?;
    println!("OK: {}", message);

    if !settings.asset.exists() {
        println!("Warning: image asset {} not found. Uploads will fail.", settings.asset.display());
    }

    Ok(())
}
