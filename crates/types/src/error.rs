// Path: crates/types/src/error.rs
//! Core error types for the XVault contract.

use serde_json::{json, Value};
use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
///
/// The code is part of the wire contract: clients dispatch on it, and the
/// audit log records it. Human messages may be reworded; codes may not.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors raised by the canonical codec.
#[derive(Error, Debug)]
pub enum CodecError {
    /// A value could not be converted into the canonical value model.
    #[error("canonical encode failed: {0}")]
    Encode(String),
    /// Bytes could not be decoded back into a value.
    #[error("{0}")]
    Decode(String),
}

/// The contract error: every failure that can surface over the wire.
///
/// Each variant carries the human message for the failure envelope; the
/// stable wire code comes from the [`ErrorCode`] impl below. Handlers fail
/// fast by returning one of these; the dispatcher reshapes it into the
/// failure envelope exactly once, at the outer boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    /// The request payload failed structural validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A ledger address failed format or checksum validation.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    /// A vault salt failed format validation.
    #[error("Invalid salt: {0}")]
    InvalidSalt(String),
    /// Signature verification failed (format, curve, or signer binding).
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
    /// A content identifier failed the acceptance grammar.
    #[error("Invalid CID: {0}")]
    InvalidCid(String),
    /// Entry or vault metadata failed validation.
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),
    /// The operation is not valid for the vault's type.
    #[error("Invalid vault type: {0}")]
    InvalidVaultType(String),
    /// The operation is structurally valid but semantically forbidden.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    /// The request named an operation the dispatcher does not know.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
    /// The vault type string is not one of the supported kinds.
    #[error("Unsupported vault type: {0}")]
    UnsupportedVaultType(String),
    /// The actor is not permitted to perform this operation.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// No vault exists under the given id.
    #[error("Vault not found: {0}")]
    VaultNotFound(String),
    /// A vault with the computed id already exists.
    #[error("Vault already exists: {0}")]
    VaultAlreadyExists(String),
    /// No entry matched the given selector.
    #[error("Entry not found: {0}")]
    EntryNotFound(String),
    /// The address already has a pending invite on this vault.
    #[error("Invite already exists: {0}")]
    InviteAlreadyExists(String),
    /// The address is already an authorized member of this vault.
    #[error("Invite already accepted: {0}")]
    InviteAlreadyAccepted(String),
    /// No pending invite exists for the given address.
    #[error("Invite not found: {0}")]
    InviteNotFound(String),
    /// The address is not an authorized member of this vault.
    #[error("Member not found: {0}")]
    MemberNotFound(String),
    /// Team operations are disabled by configuration.
    #[error("Team mode is disabled: {0}")]
    TeamModeDisabled(String),
    /// A destructive team operation requires explicit confirmation.
    #[error("Confirmation required: {0}")]
    ConfirmationRequired(String),
    /// The actor exceeded the per-round mutating-operation budget.
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),
    /// A ledger submission failed and dev-fallback is not enabled.
    #[error("XRPL submission failed: {0}")]
    XrplSubmissionFailed(String),
    /// An internal invariant was violated; never expected in normal operation.
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl ErrorCode for VaultError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "InvalidInput",
            Self::InvalidAddress(_) => "InvalidAddress",
            Self::InvalidSalt(_) => "InvalidSalt",
            Self::InvalidSignature(_) => "InvalidSignature",
            Self::InvalidCid(_) => "InvalidCid",
            Self::InvalidMetadata(_) => "InvalidMetadata",
            Self::InvalidVaultType(_) => "InvalidVaultType",
            Self::InvalidOperation(_) => "InvalidOperation",
            Self::UnknownOperation(_) => "UnknownOperation",
            Self::UnsupportedVaultType(_) => "UnsupportedVaultType",
            Self::Unauthorized(_) => "Unauthorized",
            Self::VaultNotFound(_) => "VaultNotFound",
            Self::VaultAlreadyExists(_) => "VaultAlreadyExists",
            Self::EntryNotFound(_) => "EntryNotFound",
            Self::InviteAlreadyExists(_) => "InviteAlreadyExists",
            Self::InviteAlreadyAccepted(_) => "InviteAlreadyAccepted",
            Self::InviteNotFound(_) => "InviteNotFound",
            Self::MemberNotFound(_) => "MemberNotFound",
            Self::TeamModeDisabled(_) => "TeamModeDisabled",
            Self::ConfirmationRequired(_) => "ConfirmationRequired",
            Self::RateLimitExceeded(_) => "RateLimitExceeded",
            Self::XrplSubmissionFailed(_) => "XrplSubmissionFailed",
            Self::UnexpectedError(_) => "UnexpectedError",
        }
    }
}

impl VaultError {
    /// The first 12 hex chars of `SHA-256(code + ":" + message)`.
    ///
    /// A short, stable handle that lets operators correlate a client-reported
    /// failure with audit records without shipping the full message around.
    pub fn error_id(&self) -> String {
        let preimage = format!("{}:{}", self.code(), self);
        crate::codec::digest_str(&preimage)[..12].to_string()
    }
}

impl From<CodecError> for VaultError {
    fn from(e: CodecError) -> Self {
        // Codec failures on handler-built values are programming errors, not
        // client mistakes.
        Self::UnexpectedError(e.to_string())
    }
}

/// Builds the wire success envelope `{ok:true, operation, data}`.
pub fn success_envelope(operation: &str, data: Value) -> Value {
    json!({
        "ok": true,
        "operation": operation,
        "data": data,
    })
}

/// Builds the wire failure envelope `{ok:false, error, code, errorId}`.
pub fn failure_envelope(err: &VaultError) -> Value {
    json!({
        "ok": false,
        "error": err.to_string(),
        "code": err.code(),
        "errorId": err.error_id(),
    })
}
