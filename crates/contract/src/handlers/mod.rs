// Path: crates/contract/src/handlers/mod.rs

//! Per-operation handlers, grouped by concern, plus the payload-field
//! helpers they share.
//!
//! Each handler follows the same fixed order: shape validation, signing
//! preimage, signature verification, rate limit, authorization, token
//! adapter, store mutation, persistence. The preimage of every operation is
//! a distinct record matching the wire spec exactly, with explicit null
//! sentinels for absent selectors; client and core must agree byte-for-byte.

mod entry;
mod team;
mod vault;

use serde_json::Value;
use xvault_types::error::VaultError;

/// The placeholder manifest URI used at vault creation and for manifest
/// remints without a new URI.
pub(crate) const MANIFEST_PLACEHOLDER_URI: &str = "ipfs://placeholder-for-now";

/// A required, non-empty string field.
pub(crate) fn req_str(payload: &Value, field: &str) -> Result<String, VaultError> {
    match payload.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(VaultError::InvalidInput(format!(
            "{field} must not be empty"
        ))),
        Some(_) => Err(VaultError::InvalidInput(format!("{field} must be a string"))),
        None => Err(VaultError::InvalidInput(format!("{field} is required"))),
    }
}

/// An optional string field; absent and null are both `None`.
pub(crate) fn opt_str(payload: &Value, field: &str) -> Result<Option<String>, VaultError> {
    match payload.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if !s.is_empty() => Ok(Some(s.clone())),
        Some(Value::String(_)) => Err(VaultError::InvalidInput(format!(
            "{field} must not be empty when present"
        ))),
        Some(_) => Err(VaultError::InvalidInput(format!(
            "{field} must be a string when present"
        ))),
    }
}

/// An optional boolean field; absent and null are both `None`.
pub(crate) fn opt_bool(payload: &Value, field: &str) -> Result<Option<bool>, VaultError> {
    match payload.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(VaultError::InvalidInput(format!(
            "{field} must be a boolean when present"
        ))),
    }
}

/// An optional non-negative integer index; absent and null are both `None`.
pub(crate) fn opt_index(payload: &Value, field: &str) -> Result<Option<usize>, VaultError> {
    match payload.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_u64() {
            Some(idx) => Ok(Some(idx as usize)),
            None => Err(VaultError::InvalidInput(format!(
                "{field} must be a non-negative integer"
            ))),
        },
        Some(_) => Err(VaultError::InvalidInput(format!(
            "{field} must be an integer when present"
        ))),
    }
}

/// Extracts the two signing fields. Their absence is a signature failure,
/// not a generic input failure.
pub(crate) fn signing_fields(payload: &Value) -> Result<(String, String), VaultError> {
    let signature = match payload.get("signature") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => return Err(VaultError::InvalidSignature("signature is required".into())),
    };
    let signer_public_key = match payload.get("signerPublicKey") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => {
            return Err(VaultError::InvalidSignature(
                "signerPublicKey is required".into(),
            ))
        }
    };
    Ok((signature, signer_public_key))
}

/// The create-vault preimage rule: exactly the payload mapping minus the
/// two signing fields.
pub(crate) fn preimage_without_signing(payload: &Value) -> Result<Value, VaultError> {
    let Value::Object(map) = payload else {
        return Err(VaultError::InvalidInput("payload must be an object".into()));
    };
    let mut preimage = map.clone();
    preimage.remove("signature");
    preimage.remove("signerPublicKey");
    Ok(Value::Object(preimage))
}
