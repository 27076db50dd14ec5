use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

pub const ENV_BIND_ADDR: &str = "ECO_BIND_ADDR";
pub const ENV_DATA_DIR: &str = "ECO_DATA_DIR";
pub const ENV_PROFILE_NAME: &str = "ECO_PROFILE_NAME";
pub const ENV_PROFILE_EMAIL: &str = "ECO_PROFILE_EMAIL";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory holding the ledger snapshot.
    pub data_dir: PathBuf,
    pub profile: ProfileConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8888)),
            data_dir: PathBuf::from(".data"),
            profile: ProfileConfig::default(),
        }
    }
}

/// The single implicit user shown by the profile endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub name: String,
    pub email: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: "Alex".into(),
            email: "alex@ecotrack.com".into(),
        }
    }
}

impl ServerConfig {
    /// Load from an optional TOML file, then apply `ECO_*` environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&contents)
            .map_err(|e| ServerError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Apply overrides from `lookup`, keyed by the `ENV_*` names.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ServerResult<()> {
        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            self.bind_addr = addr
                .parse()
                .map_err(|e| ServerError::Config(format!("{ENV_BIND_ADDR}={addr}: {e}")))?;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(name) = lookup(ENV_PROFILE_NAME) {
            self.profile.name = name;
        }
        if let Some(email) = lookup(ENV_PROFILE_EMAIL) {
            self.profile.email = email;
        }
        Ok(())
    }
}
