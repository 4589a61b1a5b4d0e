// Path: crates/types/src/vault.rs

//! The vault data model: vaults, entries, invites, and the password-backup
//! envelope.
//!
//! All wire and state shapes live here with their serde camelCase names, so
//! the in-memory representation, the persistence file, and the response
//! payloads stay byte-consistent. Optional fields that the protocol requires
//! as explicit null sentinels are plain `Option`s without `skip_serializing_if`,
//! so `None` always serializes as `null`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Metadata key holding the owning vault's id.
pub const META_VAULT_ID: &str = "vaultId";
/// Metadata key holding the password-backup envelope.
pub const META_PASSWORD_BACKUP: &str = "passwordBackup";
/// Metadata key for the client blob format version.
pub const META_BLOB_VERSION: &str = "blobVersion";
/// Metadata key recording the round of the last metadata write.
pub const META_LAST_UPDATED: &str = "lastUpdated";

/// The two vault kinds.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum VaultType {
    /// Single-owner vault; the authorized set is exactly the owner.
    Individual,
    /// Multi-member vault with the invite lifecycle.
    Team,
}

impl core::fmt::Display for VaultType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Individual => write!(f, "individual"),
            Self::Team => write!(f, "team"),
        }
    }
}

/// An entry decryption key wrapped for one member's public key.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WrappedKey {
    /// The member address this key is wrapped for.
    pub address: String,
    /// The wrapped key material, base64.
    pub encrypted_key: String,
}

/// Client-visible entry metadata. Unset optionals are the null sentinel.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EntryMetadata {
    /// The service this entry belongs to. Required, non-empty.
    pub service: String,
    /// Optional account name at the service.
    #[serde(default)]
    pub username: Option<String>,
    /// Optional free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// One ciphertext reference stored in a vault.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// The URI-token identifier minted for this entry.
    pub token_id: String,
    /// The content identifier of the off-site ciphertext blob.
    pub cid: String,
    /// Client-visible metadata.
    pub metadata: EntryMetadata,
    /// Per-member wrapped keys; always empty for individual vaults.
    pub wrapped_keys: Vec<WrappedKey>,
    /// Round key at insertion.
    pub created_at: String,
}

/// A not-yet-accepted membership invite.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PendingInvite {
    /// The invited address.
    pub address: String,
    /// The address that issued the invite (always the owner).
    pub invited_by: String,
    /// Round key when the invite was issued.
    pub invited_at: String,
}

/// The password-backup envelope. Opaque to the core; validated for shape only.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PasswordBackup {
    /// Envelope format version; must be 1.
    pub version: u64,
    /// The owning vault's id.
    pub vault_id: String,
    /// KDF salt, base64.
    pub salt: String,
    /// AEAD nonce, base64.
    pub nonce: String,
    /// AEAD authentication tag, base64.
    pub auth_tag: String,
    /// The encrypted root-key material, base64.
    pub ciphertext: String,
}

/// A vault record: authorization state, metadata, and ciphertext references.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Vault {
    /// 64-hex-char digest of `owner + ":" + salt`. Never mutates.
    pub id: String,
    /// The vault kind.
    #[serde(rename = "type")]
    pub vault_type: VaultType,
    /// The owning ledger address. Never mutates.
    pub owner: String,
    /// The client-chosen id salt, even-length hex. Never mutates.
    pub salt: String,
    /// Round key at creation.
    pub created_at: String,
    /// Free-form metadata map; distinguished keys are the `META_*` constants.
    pub metadata: Map<String, Value>,
    /// The manifest URI-token identifier.
    pub manifest_token_id: String,
    /// Addresses with read/write access. Always contains the owner.
    pub authorized: Vec<String>,
    /// Outstanding invites; disjoint from `authorized`.
    pub pending_invites: Vec<PendingInvite>,
    /// Ciphertext references in insertion order.
    pub entries: Vec<Entry>,
}

impl Vault {
    /// Whether `actor` may read or write this vault's entries.
    ///
    /// Individual vaults admit only the owner; team vaults admit every
    /// authorized member.
    pub fn has_access(&self, actor: &str) -> bool {
        match self.vault_type {
            VaultType::Individual => actor == self.owner,
            VaultType::Team => self.authorized.iter().any(|a| a == actor),
        }
    }

    /// Whether `actor` is the vault owner.
    pub fn is_owner(&self, actor: &str) -> bool {
        actor == self.owner
    }

    /// The round key of the most recent entry, if any.
    pub fn last_activity(&self) -> Option<&str> {
        self.entries.last().map(|e| e.created_at.as_str())
    }

    /// Builds the read-model summary used by vault listings.
    pub fn summary(&self) -> VaultSummary {
        VaultSummary {
            vault_id: self.id.clone(),
            vault_type: self.vault_type,
            created_at: self.created_at.clone(),
            entry_count: self.entries.len(),
            manifest_token_id: self.manifest_token_id.clone(),
            last_activity: self.last_activity().map(str::to_string),
        }
    }
}

/// The per-vault summary returned by vault listings.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VaultSummary {
    /// The vault id.
    pub vault_id: String,
    /// The vault kind.
    #[serde(rename = "type")]
    pub vault_type: VaultType,
    /// Round key at creation.
    pub created_at: String,
    /// Number of entries currently stored.
    pub entry_count: usize,
    /// The manifest token identifier.
    pub manifest_token_id: String,
    /// Round key of the most recent entry, or null.
    pub last_activity: Option<String>,
}

/// Derives a vault id from its owner and salt.
///
/// This is the literal concatenation `owner + ":" + salt` hashed with
/// SHA-256, NOT a canonical-encoded mapping; the two produce different
/// digests and the literal form is the wire contract.
pub fn vault_id(owner: &str, salt: &str) -> String {
    crate::codec::digest_str(&format!("{owner}:{salt}"))
}

/// Orders two round keys.
///
/// Round keys are opaque, but listings sort by them: when both sides parse
/// as finite numbers the comparison is numeric, otherwise bytewise on the
/// string form. Ties are equal.
pub fn round_key_cmp(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) if x.is_finite() && y.is_finite() => {
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        _ => a.as_bytes().cmp(b.as_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn vault_id_hashes_the_literal_concatenation() {
        let id = vault_id("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh", "aabbccddeeff0011");
        assert_eq!(
            id,
            crate::codec::digest_str("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh:aabbccddeeff0011")
        );
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn entry_metadata_serializes_unset_optionals_as_null() {
        let meta = EntryMetadata {
            service: "github".into(),
            username: Some("mike".into()),
            notes: None,
        };
        let v = serde_json::to_value(&meta).unwrap();
        assert_eq!(v, json!({"service": "github", "username": "mike", "notes": null}));
    }

    #[test]
    fn vault_type_uses_lowercase_wire_names() {
        assert_eq!(serde_json::to_value(VaultType::Individual).unwrap(), json!("individual"));
        assert_eq!(serde_json::to_value(VaultType::Team).unwrap(), json!("team"));
        assert_eq!(VaultType::Team.to_string(), "team");
    }

    #[test]
    fn round_keys_compare_numerically_then_bytewise() {
        assert_eq!(round_key_cmp("9", "10"), Ordering::Less);
        assert_eq!(round_key_cmp("10", "9"), Ordering::Greater);
        assert_eq!(round_key_cmp("7", "7"), Ordering::Equal);
        // Non-numeric keys fall back to bytewise comparison.
        assert_eq!(round_key_cmp("round-b", "round-a"), Ordering::Greater);
        assert_eq!(round_key_cmp("1x", "2"), Ordering::Less);
    }

    #[test]
    fn team_access_follows_the_authorized_set() {
        let vault = Vault {
            id: "id".into(),
            vault_type: VaultType::Team,
            owner: "rOwner".into(),
            salt: "aabb".into(),
            created_at: "1".into(),
            metadata: Map::new(),
            manifest_token_id: "tok".into(),
            authorized: vec!["rOwner".into(), "rMember".into()],
            pending_invites: vec![],
            entries: vec![],
        };
        assert!(vault.has_access("rOwner"));
        assert!(vault.has_access("rMember"));
        assert!(!vault.has_access("rStranger"));
        assert!(vault.is_owner("rOwner"));
        assert!(!vault.is_owner("rMember"));
    }
}
