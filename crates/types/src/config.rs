// Path: crates/types/src/config.rs

//! Process-wide startup configuration.
//!
//! One flat struct, loaded once at bootstrap and threaded into the
//! dispatcher as an owned value. Nothing reads configuration ambiently.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading the startup configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The config file is not valid TOML for [`NodeConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Startup options for the contract process.
///
/// Every field has a default so a missing config file means "run with
/// defaults"; a present-but-malformed file is fatal.
#[derive(Deserialize, Clone, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    /// Where state is loaded from and saved to.
    pub state_file: PathBuf,
    /// Base URL used only to compose `gatewayUrl` strings in responses.
    /// May be empty.
    pub gateway_base_url: String,
    /// Enables the team family of handlers.
    pub team_mode: bool,
    /// Selects `mutable_stub` (true) vs `burn_remint` (false) manifest
    /// updates.
    pub mutable_uri_tokens: bool,
    /// Allows the token adapter to fall back to simulated ids when a ledger
    /// submission fails.
    pub dev_fallback: bool,
    /// The ledger account that issues URI tokens.
    pub issuer_address: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from("./state/xvault-state.json"),
            gateway_base_url: String::new(),
            team_mode: true,
            mutable_uri_tokens: false,
            dev_fallback: false,
            issuer_address: String::new(),
        }
    }
}

impl NodeConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Loads from `path` when it exists, otherwise returns defaults.
    ///
    /// A file that exists but fails to parse is an error, never silently
    /// defaulted: replicas must not disagree about flags.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
