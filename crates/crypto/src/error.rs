// Path: crates/crypto/src/error.rs
//! Local error types for the `xvault-crypto` crate.

use thiserror::Error;
use xvault_types::error::VaultError;

/// Failures in request authentication and address handling.
///
/// Everything signature-related collapses to `InvalidSignature` at the wire
/// boundary; the distinct variants exist for precise internal messages and
/// for tests.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The signature field failed the shape gate (missing, not hex, too short).
    #[error("malformed signature: {0}")]
    MalformedSignature(String),
    /// The public-key field failed the shape gate.
    #[error("malformed public key: {0}")]
    MalformedPublicKey(String),
    /// The key's leading bytes match no supported curve family.
    #[error("unrecognized public key family: {0}")]
    UnrecognizedKeyFamily(String),
    /// The address derived from the signer key differs from the expected actor.
    #[error("signer address {derived} does not match expected address {expected}")]
    AddressMismatch {
        /// Address derived from the signer public key.
        derived: String,
        /// Address the operation claims to act for.
        expected: String,
    },
    /// The signature does not verify over the payload digest.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),
    /// A ledger address failed format or checksum validation.
    #[error("invalid ledger address: {0}")]
    InvalidAddress(String),
}

impl From<CryptoError> for VaultError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::InvalidAddress(msg) => VaultError::InvalidAddress(msg),
            // Every authentication failure surfaces as InvalidSignature.
            other => VaultError::InvalidSignature(other.to_string()),
        }
    }
}
