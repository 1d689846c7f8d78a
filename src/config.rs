//! Configuration for autogas-pin
//!
//! Config file: ~/.autogas-pin/config.toml (optional)
//! Credentials: PINATA_API_KEY / PINATA_SECRET_KEY from the environment

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const API_KEY_VAR: &str = "PINATA_API_KEY";
pub const SECRET_KEY_VAR: &str = "PINATA_SECRET_KEY";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pinata: PinataConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PinataConfig {
    pub api_url: String,
    pub gateway: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Image uploaded for every token
    pub asset: PathBuf,
    /// Where scratch metadata files are written
    pub work_dir: PathBuf,
}

impl Default for PinataConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.pinata.cloud".to_string(),
            gateway: "https://gateway.pinata.cloud/ipfs".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            asset: default_asset_path(),
            work_dir: std::env::temp_dir(),
        }
    }
}

/// The bundled artwork, relative to where the tool is installed.
/// Looks next to the executable first, then in the source checkout it was built from.
pub fn default_asset_path() -> PathBuf {
    let exe = std::env::current_exe().ok();
    resolve_asset_path(exe.as_deref().and_then(Path::parent))
}

fn resolve_asset_path(exe_dir: Option<&Path>) -> PathBuf {
    let bundled = |root: &Path| root.join("assets").join("Autogas.jpg");
    exe_dir
        .map(bundled)
        .filter(|p| p.is_file())
        .unwrap_or_else(|| bundled(Path::new(env!("CARGO_MANIFEST_DIR"))))
}

/// Get the config directory (~/.autogas-pin)
pub fn config_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".autogas-pin"))
        .ok_or_else(|| Error::Config("could not find home directory".to_string()))
}

/// Get the default config file path (~/.autogas-pin/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load configuration from `path`, or from the default location.
/// A missing default file yields defaults; a missing explicit file is an error.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match config_path() {
            Ok(p) => (p, false),
            Err(_) => return Ok(Config::default()),
        },
    };

    if !path.exists() {
        if explicit {
            return Err(Error::Config(format!(
                "config file {} does not exist",
                path.display()
            )));
        }
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::io(format!("failed to read {}", path.display()), e))?;
    parse(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

fn parse(content: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(content)
}

/// Pinata API credentials
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    secret: String,
}

impl Credentials {
    pub fn new(api_key: &str, secret: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            secret: secret.to_string(),
        }
    }

    /// Read both credentials from the environment, failing on the first
    /// one that is unset or blank
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let fetch = |var: &'static str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(Error::MissingCredential(var))
        };
        let api_key = fetch(API_KEY_VAR)?;
        let secret = fetch(SECRET_KEY_VAR)?;
        Ok(Self::new(&api_key, &secret))
    }

    pub fn expose_secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn test_credentials_present() {
        let creds =
            Credentials::from_lookup(lookup(&[(API_KEY_VAR, "key"), (SECRET_KEY_VAR, "shh")]))
                .unwrap();
        assert_eq!(creds.api_key, "key");
        assert_eq!(creds.expose_secret(), "shh");
        assert!(!format!("{:?}", creds).contains("shh"));
    }

    #[test]
    fn test_credentials_missing_or_blank() {
        let err = Credentials::from_lookup(lookup(&[(SECRET_KEY_VAR, "shh")])).unwrap_err();
        assert!(matches!(err, Error::MissingCredential(API_KEY_VAR)));

        let err = Credentials::from_lookup(lookup(&[(API_KEY_VAR, "key"), (SECRET_KEY_VAR, "  ")]))
            .unwrap_err();
        assert!(matches!(err, Error::MissingCredential(SECRET_KEY_VAR)));
    }

    #[test]
    fn test_parse_partial_config() {
        let config = parse(
            r#"
            [pinata]
            gateway = "https://ipfs.io/ipfs"

            [paths]
            asset = "/srv/art/token.png"
            "#,
        )
        .unwrap();
        assert_eq!(config.pinata.gateway, "https://ipfs.io/ipfs");
        assert_eq!(config.pinata.api_url, "https://api.pinata.cloud");
        assert_eq!(config.paths.asset, PathBuf::from("/srv/art/token.png"));
        assert_eq!(config.paths.work_dir, std::env::temp_dir());
    }

    #[test]
    fn test_load_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[pinata]\napi_url = \"http://localhost:3000\"\n").unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.pinata.api_url, "http://localhost:3000");

        let err = load(Some(&tmp.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_default_asset_path() {
        assert!(default_asset_path().ends_with("assets/Autogas.jpg"));
    }

    #[test]
    fn test_asset_next_to_executable_wins() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("assets")).unwrap();
        std::fs::write(tmp.path().join("assets/Autogas.jpg"), [0xff, 0xd8]).unwrap();

        let path = resolve_asset_path(Some(tmp.path()));
        assert_eq!(path, tmp.path().join("assets").join("Autogas.jpg"));
    }

    #[test]
    fn test_asset_falls_back_to_source_checkout() {
        let tmp = TempDir::new().unwrap();
        let fallback = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets").join("Autogas.jpg");

        assert_eq!(resolve_asset_path(Some(tmp.path())), fallback);
        assert_eq!(resolve_asset_path(None), fallback);
    }
}
