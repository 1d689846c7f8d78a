//! Subcommand implementations

pub mod batch;
pub mod check;
pub mod single;

use crate::cli::Cli;
use crate::config::{self, Config, Credentials};
use crate::pinning::PinataClient;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Resolved run settings: config file values with command-line overrides
#[derive(Debug)]
pub struct Settings {
    pub config: Config,
    pub asset: PathBuf,
    pub work_dir: PathBuf,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let config = config::load(cli.config.as_deref()).context("Failed to load config")?;
        let asset = cli
            .asset
            .clone()
            .unwrap_or_else(|| config.paths.asset.clone());
        let work_dir = cli
            .work_dir
            .clone()
            .unwrap_or_else(|| config.paths.work_dir.clone());
        Ok(Self {
            config,
            asset,
            work_dir,
        })
    }

    /// Build the Pinata client; credentials are checked here, before any upload
    pub fn pinata_client(&self) -> Result<PinataClient> {
        let credentials = Credentials::from_env().context("Pinata credentials are required")?;
        let client = PinataClient::new(&self.config.pinata.api_url, &credentials)
            .context("Failed to create Pinata client")?;
        Ok(client)
    }

    pub fn gateway_url(&self, cid: &str) -> String {
        format!("{}/{}/", self.config.pinata.gateway.trim_end_matches('/'), cid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            "[paths]\nasset = \"/from/config.jpg\"\nwork_dir = \"/from/config\"\n",
        )
        .unwrap();
        let path = path.to_str().unwrap();

        let cli = Cli::try_parse_from(["autogas-pin", "--config", path]).unwrap();
        let settings = Settings::resolve(&cli).unwrap();
        assert_eq!(settings.asset, PathBuf::from("/from/config.jpg"));
        assert_eq!(settings.work_dir, PathBuf::from("/from/config"));

        let cli =
            Cli::try_parse_from(["autogas-pin", "--config", path, "--asset", "cli.jpg"]).unwrap();
        let settings = Settings::resolve(&cli).unwrap();
        assert_eq!(settings.asset, PathBuf::from("cli.jpg"));
    }

    #[test]
    fn test_gateway_url() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[pinata]\ngateway = \"https://ipfs.io/ipfs/\"\n").unwrap();

        let cli = Cli::try_parse_from(["autogas-pin", "--config", path.to_str().unwrap()]).unwrap();
        let settings = Settings::resolve(&cli).unwrap();
        assert_eq!(settings.gateway_url("bafy1"), "https://ipfs.io/ipfs/bafy1/");
    }
}
