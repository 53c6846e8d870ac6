//! Client configuration.
//!
//! Loaded from TOML; every key is optional. Example:
//!
//! ```toml
//! timeout_secs = 5
//! max_referral_hops = 3
//! regional_servers = ["whois.ripe.net", "whois.arin.net"]
//!
//! [tld_servers]
//! dev = "whois.nic.google"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, WhoisError};
use crate::whois::{DEFAULT_MAX_REFERRAL_HOPS, DEFAULT_TIMEOUT, MAX_RESPONSE_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhoisConfig {
    /// Timeout for each connect, write and read, in seconds.
    pub timeout_secs: u64,
    /// Responses larger than this are rejected.
    pub max_response_bytes: usize,
    /// Referrals followed after the first server before giving up.
    pub max_referral_hops: usize,
    /// Regional registries queried at once; defaults to all of them.
    pub concurrency: Option<usize>,
    /// Replaces the built-in regional registry list when non-empty.
    pub regional_servers: Vec<String>,
    /// Per-TLD server overrides.
    pub tld_servers: BTreeMap<String, String>,
}

impl Default for WhoisConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            max_response_bytes: MAX_RESPONSE_SIZE,
            max_referral_hops: DEFAULT_MAX_REFERRAL_HOPS,
            concurrency: None,
            regional_servers: Vec::new(),
            tld_servers: BTreeMap::new(),
        }
    }
}

impl WhoisConfig {
    /// `~/.config/whorl/config.toml` on Linux, the platform equivalent elsewhere.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("whorl").join("config.toml"))
    }

    /// Load from the default path, falling back to defaults when absent.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| WhoisError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| WhoisError::Config(format!("{}: {}", path.display(), e)))?;
        config
            .validate()
            .map_err(|e| WhoisError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| WhoisError::Config(e.to_string()))?;
        config.validate().map_err(WhoisError::Config)?;
        Ok(config)
    }

    /// Reject values that would make every lookup fail.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be at least 1".to_string());
        }
        if self.max_response_bytes == 0 {
            return Err("max_response_bytes must be at least 1".to_string());
        }
        if self.concurrency == Some(0) {
            return Err("concurrency must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
