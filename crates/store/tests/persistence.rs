// Path: crates/store/tests/persistence.rs
//! Durable save/load behavior of the vault store.

use serde_json::Map;
use xvault_store::{NewVault, VaultStore};
use xvault_types::vault::{vault_id, Entry, EntryMetadata, VaultType};

const OWNER: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

fn seeded(state_file: std::path::PathBuf) -> VaultStore {
    let mut store = VaultStore::new(state_file);
    store
        .create_vault(NewVault {
            owner: OWNER.to_string(),
            salt: "aabbccddeeff0011".to_string(),
            vault_type: VaultType::Team,
            metadata: Map::new(),
            created_at: "1".to_string(),
            manifest_token_id: "manifest-token".to_string(),
            authorized: Vec::new(),
            pending_invites: Vec::new(),
        })
        .unwrap();
    let id = vault_id(OWNER, "aabbccddeeff0011");
    store
        .add_entry(
            &id,
            OWNER,
            Entry {
                token_id: "tok-1".to_string(),
                cid: "bafybeigdyrztf4f6xsl54n4xq4m5gxezm5q4za2ojx6x7lf5y3w4f4xhqy".to_string(),
                metadata: EntryMetadata {
                    service: "github".into(),
                    username: None,
                    notes: None,
                },
                wrapped_keys: Vec::new(),
                created_at: "2".to_string(),
            },
        )
        .unwrap();
    store
}

#[tokio::test]
async fn save_then_open_round_trips_state_and_digest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("xvault-state.json");

    let store = seeded(path.clone());
    let digest_before = store.digest().unwrap();
    store.save().await.unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with("{\n"), "state file must be pretty-printed");
    assert!(raw.ends_with('\n'), "state file must end with a newline");
    assert!(raw.contains("\"vaults\""));

    let reopened = VaultStore::open(path).unwrap();
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.digest().unwrap(), digest_before);
}

#[tokio::test]
async fn absent_file_starts_empty_and_corrupt_file_refuses() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("xvault-state.json");

    let empty = VaultStore::open(path.clone()).unwrap();
    assert!(empty.is_empty());

    std::fs::write(&path, b"{ not json").unwrap();
    let err = VaultStore::open(path).unwrap_err();
    assert!(err.to_string().contains("refusing to start"));
}

#[tokio::test]
async fn save_is_idempotent_for_unchanged_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("xvault-state.json");
    let store = seeded(path.clone());
    store.save().await.unwrap();
    let first = std::fs::read(&path).unwrap();
    store.save().await.unwrap();
    let second = std::fs::read(&path).unwrap();
    assert_eq!(first, second);
}
