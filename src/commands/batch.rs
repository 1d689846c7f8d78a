//! autogas-pin batch - Upload artwork once and metadata for a numbered collection

use super::Settings;
use crate::cli::BatchCmd;
use crate::upload;
use anyhow::{Context, Result};

pub async fn run(settings: Settings, cmd: BatchCmd) -> Result<()> {
    let client = settings.pinata_client()?;

    println!("Uploading collection metadata...");
    println!("Asset: {}", settings.asset.display());
    println!("Tokens: 1..={}", cmd.count);
    println!();

    let cid = upload::upload_batch(&client, &settings.asset, &settings.work_dir, cmd.count)
        .await
        .with_context(|| format!("Batch upload of {} tokens failed", cmd.count))?;

    println!();
    println!("=== Collection Summary ===");
    println!("Folder CID: {}", cid);
    println!("Token 1: {}1.json", crate::metadata::base_uri(&cid));
    println!("Gateway: {}", settings.gateway_url(&cid));

    Ok(())
}
