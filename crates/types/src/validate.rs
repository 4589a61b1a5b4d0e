// Path: crates/types/src/validate.rs

//! Shape validation for client-supplied fields.
//!
//! Everything here is cheap and pure: sensitive inputs are validated for
//! shape before any cryptographic work so failure paths stay inexpensive and
//! leak nothing. Address checksum validation needs hashing and therefore
//! lives in `xvault-crypto`; this module holds everything that does not.

use crate::error::VaultError;
use crate::vault::{EntryMetadata, PasswordBackup, WrappedKey};
use crate::{MAX_ENCRYPTED_BLOB_BYTES, MAX_WRAPPED_KEYS};
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// CIDv0: base58btc SHA-256 multihash.
static CID_V0: Lazy<Regex> =
    Lazy::new(|| Regex::new("^Qm[1-9A-HJ-NP-Za-km-z]{44}$").expect("static CID pattern"));
/// CIDv1 base32.
static CID_V1_B32: Lazy<Regex> =
    Lazy::new(|| Regex::new("^b[a-z2-7]{20,}$").expect("static CID pattern"));
/// CIDv1 base36.
static CID_V1_B36: Lazy<Regex> =
    Lazy::new(|| Regex::new("^k[0-9a-z]{20,}$").expect("static CID pattern"));

/// Validates a vault id salt: even-length hex, 16–256 chars.
pub fn validate_salt(salt: &str) -> Result<(), VaultError> {
    let len = salt.len();
    if !(16..=256).contains(&len) || len % 2 != 0 {
        return Err(VaultError::InvalidSalt(format!(
            "salt must be even-length hex of 16-256 chars, got length {len}"
        )));
    }
    if !salt.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(VaultError::InvalidSalt("salt must be hex".into()));
    }
    Ok(())
}

/// Validates a content identifier against the acceptance grammar.
pub fn validate_cid(cid: &str) -> Result<(), VaultError> {
    if !(10..=120).contains(&cid.len()) {
        return Err(VaultError::InvalidCid(format!(
            "cid length {} outside 10-120",
            cid.len()
        )));
    }
    if CID_V0.is_match(cid) || CID_V1_B32.is_match(cid) || CID_V1_B36.is_match(cid) {
        Ok(())
    } else {
        Err(VaultError::InvalidCid(format!("cid does not match any supported form: {cid}")))
    }
}

/// Decodes a base64 field, requiring round-trip equality modulo padding.
///
/// Accepts both padded and unpadded input; rejects whitespace, URL-safe
/// alphabets, and any string that does not re-encode to itself.
pub fn decode_base64_strict(field: &str, value: &str) -> Result<Vec<u8>, VaultError> {
    let trimmed = value.trim_end_matches('=');
    let decoded = STANDARD_NO_PAD
        .decode(trimmed)
        .map_err(|e| VaultError::InvalidInput(format!("{field} is not valid base64: {e}")))?;
    if STANDARD_NO_PAD.encode(&decoded) != trimmed {
        return Err(VaultError::InvalidInput(format!(
            "{field} is not canonical base64"
        )));
    }
    Ok(decoded)
}

/// Validates the client's encrypted blob: base64, decoded size ≤ 1 MiB.
///
/// The blob itself is never persisted; the contract stores it only by CID
/// reference, but its shape is still part of the signed payload.
pub fn validate_encrypted_blob(blob: &str) -> Result<(), VaultError> {
    let decoded = decode_base64_strict("encryptedBlob", blob)?;
    if decoded.is_empty() {
        return Err(VaultError::InvalidInput("encryptedBlob must not be empty".into()));
    }
    if decoded.len() > MAX_ENCRYPTED_BLOB_BYTES {
        return Err(VaultError::InvalidInput(format!(
            "encryptedBlob decodes to {} bytes, limit is {MAX_ENCRYPTED_BLOB_BYTES}",
            decoded.len()
        )));
    }
    Ok(())
}

/// Validates entry metadata field lengths.
pub fn validate_entry_metadata(meta: &EntryMetadata) -> Result<(), VaultError> {
    if meta.service.is_empty() || meta.service.len() > 128 {
        return Err(VaultError::InvalidMetadata(
            "service must be 1-128 chars".into(),
        ));
    }
    if let Some(username) = &meta.username {
        if username.is_empty() || username.len() > 256 {
            return Err(VaultError::InvalidMetadata(
                "username must be 1-256 chars when present".into(),
            ));
        }
    }
    if let Some(notes) = &meta.notes {
        if notes.is_empty() || notes.len() > 4096 {
            return Err(VaultError::InvalidMetadata(
                "notes must be 1-4096 chars when present".into(),
            ));
        }
    }
    Ok(())
}

/// Validates the wrapped-key list shape (count and base64 payloads).
///
/// Address checksum validation is the caller's job; it needs the crypto
/// crate.
pub fn validate_wrapped_keys_shape(keys: &[WrappedKey]) -> Result<(), VaultError> {
    if keys.len() > MAX_WRAPPED_KEYS {
        return Err(VaultError::InvalidInput(format!(
            "wrappedKeys has {} items, limit is {MAX_WRAPPED_KEYS}",
            keys.len()
        )));
    }
    for key in keys {
        decode_base64_strict("wrappedKeys.encryptedKey", &key.encrypted_key)?;
    }
    Ok(())
}

/// Validates a password-backup envelope against its owning vault id.
///
/// The envelope stays opaque: only structure is checked, never content.
pub fn validate_password_backup(
    value: &Value,
    expected_vault_id: &str,
) -> Result<PasswordBackup, VaultError> {
    let backup: PasswordBackup = serde_json::from_value(value.clone())
        .map_err(|e| VaultError::InvalidMetadata(format!("malformed password backup: {e}")))?;
    if backup.version != 1 {
        return Err(VaultError::InvalidMetadata(format!(
            "unsupported password backup version {}",
            backup.version
        )));
    }
    if backup.vault_id != expected_vault_id {
        return Err(VaultError::InvalidMetadata(
            "password backup vaultId does not match vault".into(),
        ));
    }
    for (field, payload) in [
        ("salt", &backup.salt),
        ("nonce", &backup.nonce),
        ("authTag", &backup.auth_tag),
        ("ciphertext", &backup.ciphertext),
    ] {
        let decoded = decode_base64_strict(field, payload)?;
        if decoded.is_empty() {
            return Err(VaultError::InvalidMetadata(format!(
                "password backup {field} must not be empty"
            )));
        }
    }
    Ok(backup)
}
