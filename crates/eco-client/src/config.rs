use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::LocalCache;
use crate::client::LedgerClient;
use crate::error::{ClientError, ClientResult};
use crate::kv::FileKeyValueStore;
use crate::remote::RemoteBackend;

pub const ENV_SERVER_URL: &str = "ECO_SERVER_URL";
pub const ENV_CACHE_PATH: &str = "ECO_CACHE_PATH";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "ECO_REQUEST_TIMEOUT_MS";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the ledger server.
    pub server_url: String,
    /// File backing the local cache.
    pub cache_path: PathBuf,
    /// Per-request transport timeout. `None` waits as long as the transport
    /// allows.
    pub request_timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8888".into(),
            cache_path: PathBuf::from(".eco-cache.json"),
            request_timeout_ms: None,
        }
    }
}

impl ClientConfig {
    /// Load from an optional TOML file, then apply `ECO_*` environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> ClientResult<Self> {
        let mut config: Self = match path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|e| {
                    ClientError::Config(format!("failed to read {}: {e}", path.display()))
                })?;
                toml::from_str(&contents).map_err(|e| {
                    ClientError::Config(format!("failed to parse {}: {e}", path.display()))
                })?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ClientResult<()> {
        if let Some(url) = lookup(ENV_SERVER_URL) {
            self.server_url = url;
        }
        if let Some(path) = lookup(ENV_CACHE_PATH) {
            self.cache_path = PathBuf::from(path);
        }
        if let Some(ms) = lookup(ENV_REQUEST_TIMEOUT_MS) {
            let ms = ms
                .parse()
                .map_err(|e| ClientError::Config(format!("{ENV_REQUEST_TIMEOUT_MS}={ms}: {e}")))?;
            self.request_timeout_ms = Some(ms);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Build an HTTP client backed by the file cache at `cache_path`.
    pub fn connect(&self) -> ClientResult<LedgerClient<RemoteBackend, FileKeyValueStore>> {
        let remote = RemoteBackend::new(self.server_url.clone(), self.request_timeout())?;
        let kv = FileKeyValueStore::open(&self.cache_path)?;
        Ok(LedgerClient::new(remote, LocalCache::new(kv)))
    }
}
