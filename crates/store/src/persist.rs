// Path: crates/store/src/persist.rs

//! Durable save/load of the vault state to a single JSON file.
//!
//! The on-disk format is part of the operational contract: pretty-printed
//! JSON `{"vaults": {...}}` with a trailing newline, so replica state files
//! diff cleanly. Writes go through a temp file in the same directory
//! followed by a rename; the state file has exactly one writer, this
//! process.
//!
//! Startup semantics are strict: an absent file means a fresh store, but a
//! present file that fails to parse refuses to start. Silently dropping
//! state on a replica would fork the cluster.

use crate::VaultStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use xvault_types::error::VaultError;
use xvault_types::vault::Vault;

/// The persisted document shape.
#[derive(Serialize, Deserialize, Default)]
pub(crate) struct StateFile {
    pub vaults: BTreeMap<String, Vault>,
}

/// Borrowing twin of [`StateFile`] for serialization without cloning.
#[derive(Serialize)]
pub(crate) struct StateFileRef<'a> {
    pub vaults: &'a BTreeMap<String, Vault>,
}

/// Errors raised while loading the state file at startup.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The state file exists but could not be read.
    #[error("failed to read state file: {0}")]
    Io(#[from] std::io::Error),
    /// The state file exists but is not a valid state document.
    #[error("state file is corrupt, refusing to start: {0}")]
    Parse(#[from] serde_json::Error),
}

impl VaultStore {
    /// Opens the store from `state_file`, initializing empty when the file
    /// is absent and failing when it is present but unparsable.
    pub fn open(state_file: PathBuf) -> Result<Self, LoadError> {
        match std::fs::read(&state_file) {
            Ok(bytes) => {
                let parsed: StateFile = serde_json::from_slice(&bytes)?;
                tracing::info!(
                    target: "xvault::store",
                    path = %state_file.display(),
                    vaults = parsed.vaults.len(),
                    "state loaded"
                );
                Ok(Self {
                    vaults: parsed.vaults,
                    state_file,
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    target: "xvault::store",
                    path = %state_file.display(),
                    "no state file, starting empty"
                );
                Ok(Self::new(state_file))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The path this store persists to.
    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    /// Rewrites the state file to mirror the in-memory state.
    ///
    /// Called by the dispatcher after every committed mutation. The write is
    /// temp-file-then-rename so a crash mid-write never leaves a torn file.
    pub async fn save(&self) -> Result<(), VaultError> {
        let document = StateFileRef {
            vaults: &self.vaults,
        };
        let mut body = serde_json::to_string_pretty(&document)
            .map_err(|e| VaultError::UnexpectedError(format!("state serialization failed: {e}")))?;
        body.push('\n');

        if let Some(parent) = self.state_file.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    VaultError::UnexpectedError(format!("cannot create state directory: {e}"))
                })?;
            }
        }
        let tmp = self.state_file.with_extension("json.tmp");
        tokio::fs::write(&tmp, body.as_bytes())
            .await
            .map_err(|e| VaultError::UnexpectedError(format!("state write failed: {e}")))?;
        tokio::fs::rename(&tmp, &self.state_file)
            .await
            .map_err(|e| VaultError::UnexpectedError(format!("state rename failed: {e}")))?;
        Ok(())
    }
}
