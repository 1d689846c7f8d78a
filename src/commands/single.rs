//! autogas-pin single - Upload artwork and metadata for token #1

use super::Settings;
use crate::upload;
use anyhow::{Context, Result};

pub async fn run(settings: Settings) -> Result<()> {
    let client = settings.pinata_client()?;

    println!("Uploading single-token metadata...");
    println!("Asset: {}", settings.asset.display());
    println!();

    let cid = upload::upload_single(&client, &settings.asset, &settings.work_dir)
        .await
        .context("Single-token upload failed")?;

    println!("Gateway: {}", settings.gateway_url(&cid));
    Ok(())
}
