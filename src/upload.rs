//! Upload orchestration
//!
//! Image first, then metadata. Scratch files live in a `TempDir` so they
//! are removed whether the run succeeds or not.

use std::path::Path;
use tempfile::TempDir;

use crate::error::{Error, Result};
use crate::metadata::{self, SchemaValidator};
use crate::pinning::{PinDirectory, PinFile, PinOptions, PinningService};

const IMAGE_PIN_NAME: &str = "Autogas-NFT-Image";
const METADATA_PIN_NAME: &str = "Autogas-NFT-Metadata";
const COLLECTION_PIN_NAME: &str = "Autogas-NFT-Collection-Metadata";

const METADATA_FILE: &str = "metadata.json";
const METADATA_DIR: &str = "metadata";

/// Upload the image and metadata for token #1. Returns the metadata CID.
pub async fn upload_single<S>(service: &S, asset: &Path, work_dir: &Path) -> Result<String>
where
    S: PinningService + ?Sized,
{
    let result = single(service, asset, work_dir).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, asset = %asset.display(), "error uploading to pinning service");
    }
    result
}

/// Upload the image once and a folder of metadata for tokens `1..=count`.
/// Returns the folder CID.
pub async fn upload_batch<S>(
    service: &S,
    asset: &Path,
    work_dir: &Path,
    count: u32,
) -> Result<String>
where
    S: PinningService + ?Sized,
{
    let result = batch(service, asset, work_dir, count).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, count, "error uploading collection metadata");
    }
    result
}

async fn single<S>(service: &S, asset: &Path, work_dir: &Path) -> Result<String>
where
    S: PinningService + ?Sized,
{
    let validator = SchemaValidator::new()?;
    let image_cid = pin_image(service, asset).await?;
    println!("Image uploaded to IPFS: {}", image_cid);

    let record = metadata::build(&image_cid, 1);
    validator.validate(&record)?;

    let scratch = scratch_dir(work_dir)?;
    let path = scratch.path().join(METADATA_FILE);
    write_record(&path, &record)?;

    let file = PinFile::read(&path)
        .map_err(|e| Error::io(format!("failed to read back {}", path.display()), e))?;
    let cid = service
        .pin_file(file, &PinOptions::tagged(METADATA_PIN_NAME, "metadata"))
        .await?;
    println!("Metadata uploaded to IPFS: {}", cid);

    close(scratch)?;

    println!("Use this as your base URI: {}", metadata::base_uri(&cid));
    Ok(cid)
}

async fn batch<S>(service: &S, asset: &Path, work_dir: &Path, count: u32) -> Result<String>
where
    S: PinningService + ?Sized,
{
    if count == 0 {
        return Err(Error::EmptyBatch);
    }
    let validator = SchemaValidator::new()?;
    let image_cid = pin_image(service, asset).await?;
    println!("Image uploaded to IPFS: {}", image_cid);

    let scratch = scratch_dir(work_dir)?;
    let folder = scratch.path().join(METADATA_DIR);
    std::fs::create_dir_all(&folder)
        .map_err(|e| Error::io(format!("failed to create {}", folder.display()), e))?;

    for token_id in 1..=count {
        let record = metadata::build(&image_cid, token_id);
        validator.validate(&record)?;
        write_record(&folder.join(format!("{}.json", token_id)), &record)?;
    }
    tracing::info!(count, folder = %folder.display(), "metadata written");

    let dir = PinDirectory::read(&folder)
        .map_err(|e| Error::io(format!("failed to read {}", folder.display()), e))?;
    let cid = service
        .pin_directory(dir, &PinOptions::tagged(COLLECTION_PIN_NAME, "collection"))
        .await?;
    println!("Metadata folder uploaded to IPFS: {}", cid);

    close(scratch)?;

    println!("Use this as your base URI: {}", metadata::base_uri(&cid));
    Ok(cid)
}

/// Read the asset before any network call so a missing file fails fast
async fn pin_image<S>(service: &S, asset: &Path) -> Result<String>
where
    S: PinningService + ?Sized,
{
    let file = PinFile::read(asset).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => Error::AssetNotFound(asset.to_path_buf()),
        _ => Error::AssetUnreadable {
            path: asset.to_path_buf(),
            source,
        },
    })?;
    tracing::info!(asset = %asset.display(), bytes = file.bytes.len(), "uploading image");

    let cid = service
        .pin_file(file, &PinOptions::tagged(IMAGE_PIN_NAME, "image"))
        .await?;
    Ok(cid)
}

fn scratch_dir(work_dir: &Path) -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix("autogas-pin-")
        .tempdir_in(work_dir)
        .map_err(|e| Error::io(format!("failed to create scratch dir in {}", work_dir.display()), e))
}

fn write_record(path: &Path, record: &metadata::NftMetadata) -> Result<()> {
    let json = metadata::to_pretty_json(record)?;
    std::fs::write(path, json).map_err(|e| Error::io(format!("failed to write {}", path.display()), e))
}

fn close(scratch: TempDir) -> Result<()> {
    let path = scratch.path().to_path_buf();
    scratch
        .close()
        .map_err(|e| Error::io(format!("failed to remove {}", path.display()), e))
}
