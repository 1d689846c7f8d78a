//! Pinning service client
//!
//! Pins files and folders through the Pinata HTTP API and classifies
//! failures at the boundary.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::Credentials;

#[derive(Debug, Error)]
pub enum PinError {
    #[error("pinning client misconfigured: {0}")]
    Configuration(String),
    #[error("network error talking to pinning service: {0}")]
    Network(#[source] reqwest::Error),
    #[error("pinning service rejected request ({status}): {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("unexpected response from pinning service: {0}")]
    Unknown(String),
}

pub type PinResult<T> = std::result::Result<T, PinError>;

/// Free-form tagging attached to a pin, for the operator's bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PinOptions {
    pub name: String,
    pub keyvalues: BTreeMap<String, String>,
}

impl PinOptions {
    /// Label a pin with `name` and a single `type` key
    pub fn tagged(name: &str, kind: &str) -> Self {
        let mut keyvalues = BTreeMap::new();
        keyvalues.insert("type".to_string(), kind.to_string());
        Self {
            name: name.to_string(),
            keyvalues,
        }
    }
}

/// A single file ready to be pinned
#[derive(Debug, Clone)]
pub struct PinFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PinFile {
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();
        Ok(Self { file_name, bytes })
    }
}

/// A folder ready to be pinned as one unit. Entry paths are prefixed with
/// the folder name, e.g. `metadata/1.json`.
#[derive(Debug, Clone)]
pub struct PinDirectory {
    pub name: String,
    pub entries: Vec<(String, Vec<u8>)>,
}

impl PinDirectory {
    pub fn read(dir: &Path) -> std::io::Result<Self> {
        let name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("folder")
            .to_string();

        let mut entries = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(dir)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(entry.file_name()));
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let bytes = std::fs::read(entry.path())?;
            entries.push((format!("{}/{}", name, relative), bytes));
        }

        Ok(Self { name, entries })
    }
}

/// The two capabilities the uploader needs from a pinning service
#[async_trait]
pub trait PinningService: Send + Sync {
    /// Pin one file, returning its CID
    async fn pin_file(&self, file: PinFile, options: &PinOptions) -> PinResult<String>;

    /// Pin a folder, returning the CID of the folder root
    async fn pin_directory(&self, dir: PinDirectory, options: &PinOptions) -> PinResult<String>;
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    message: String,
}

/// Pinata API client
#[derive(Clone)]
pub struct PinataClient {
    client: reqwest::Client,
    api_url: String,
}

impl PinataClient {
    pub fn new(api_url: &str, credentials: &Credentials) -> PinResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("pinata_api_key", header_value(&credentials.api_key)?);
        headers.insert(
            "pinata_secret_api_key",
            header_value(credentials.expose_secret())?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| PinError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Check that the credentials are accepted
    pub async fn test_authentication(&self) -> PinResult<String> {
        let url = format!("{}/data/testAuthentication", self.api_url);
        let res = self.client.get(&url).send().await.map_err(classify_transport)?;
        let res = ensure_success(res).await?;
        let body: AuthResponse = res
            .json()
            .await
            .map_err(|e| PinError::Unknown(format!("invalid auth response: {}", e)))?;
        Ok(body.message)
    }

    async fn pin_form(&self, form: Form) -> PinResult<String> {
        let url = format!("{}/pinning/pinFileToIPFS", self.api_url);
        tracing::debug!(%url, "pinning");

        let res = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(classify_transport)?;
        let res = ensure_success(res).await?;

        let body: PinResponse = res
            .json()
            .await
            .map_err(|e| PinError::Unknown(format!("invalid pin response: {}", e)))?;
        body.ipfs_hash
            .filter(|h| !h.is_empty())
            .ok_or_else(|| PinError::Unknown("no IpfsHash in pin response".to_string()))
    }
}

#[async_trait]
impl PinningService for PinataClient {
    async fn pin_file(&self, file: PinFile, options: &PinOptions) -> PinResult<String> {
        let part = Part::bytes(file.bytes).file_name(file.file_name);
        let form = Form::new()
            .part("file", part)
            .text("pinataMetadata", pinata_metadata(options)?);
        self.pin_form(form).await
    }

    async fn pin_directory(&self, dir: PinDirectory, options: &PinOptions) -> PinResult<String> {
        if dir.entries.is_empty() {
            return Err(PinError::Configuration(format!(
                "folder {} has no files to pin",
                dir.name
            )));
        }
        let mut form = Form::new();
        for (path, bytes) in dir.entries {
            form = form.part("file", Part::bytes(bytes).file_name(path));
        }
        let form = form.text("pinataMetadata", pinata_metadata(options)?);
        self.pin_form(form).await
    }
}

fn header_value(value: &str) -> PinResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| PinError::Configuration("credential is not a valid header value".to_string()))
}

fn pinata_metadata(options: &PinOptions) -> PinResult<String> {
    serde_json::to_string(options)
        .map_err(|e| PinError::Configuration(format!("failed to encode pin options: {}", e)))
}

fn classify_transport(err: reqwest::Error) -> PinError {
    if err.is_builder() {
        PinError::Configuration(err.to_string())
    } else {
        PinError::Network(err)
    }
}

async fn ensure_success(res: reqwest::Response) -> PinResult<reqwest::Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = match res.text().await {
        Ok(body) => body,
        Err(e) => format!("<unreadable body: {}>", e),
    };
    Err(classify_status(status, body))
}

fn classify_status(status: StatusCode, body: String) -> PinError {
    if status.is_client_error() || status.is_server_error() {
        PinError::Rejected { status, body }
    } else {
        PinError::Unknown(format!("unexpected status {}: {}", status, body))
    }
}
