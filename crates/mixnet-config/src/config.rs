//! Configuration for a mixnet component (relay, collector, or client).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use mixnet_types::{MAX_TRIES, POOL_SIZE, SOCKET_TIMEOUT_SECS};

/// Tunable parameters shared by every mixnet component, loadable from a
/// TOML file or defaulted when none is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixnetConfig {
    /// Number of peeled packets a relay buffers before a batch release.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    /// Idle timeout, in seconds, for a relay or collector's accept loop.
    #[serde(default = "default_socket_timeout_secs")]
    pub socket_timeout_secs: u64,
    /// Maximum connect-and-send attempts before a packet is dropped.
    #[serde(default = "default_max_tries")]
    pub max_tries: u32,
    /// When set, all `encrypt_layer`/`decrypt_layer` and terminal
    /// asymmetric-encryption operations become identity. Used to test
    /// routing logic in isolation from cryptography.
    #[serde(default)]
    pub debug_mode: bool,
    /// `tracing_subscriber` env-filter directive, e.g. `"info"` or
    /// `"mixnet_relay=debug,info"`.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_pool_size() -> usize {
    POOL_SIZE
}

fn default_socket_timeout_secs() -> u64 {
    SOCKET_TIMEOUT_SECS
}

fn default_max_tries() -> u32 {
    MAX_TRIES
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for MixnetConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            socket_timeout_secs: default_socket_timeout_secs(),
            max_tries: default_max_tries(),
            debug_mode: false,
            log_filter: default_log_filter(),
        }
    }
}

impl MixnetConfig {
    /// Load configuration from `path`. Falls back to defaults if the file
    /// does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Write this configuration to `path` as TOML.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Install a `tracing_subscriber` formatter using [`MixnetConfig::log_filter`].
    /// Callers should invoke this once, at process start.
    pub fn init_tracing(&self) {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(&self.log_filter))
            .init();
    }

    pub fn socket_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.socket_timeout_secs)
    }
}

/// Default config file location, honoring `MIXNET_CONFIG_DIR` if set.
pub fn default_config_path() -> PathBuf {
    if let Ok(dir) = std::env::var("MIXNET_CONFIG_DIR") {
        return PathBuf::from(dir).join("mixnet.toml");
    }
    PathBuf::from("mixnet.toml")
}
