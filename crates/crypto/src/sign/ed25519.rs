// Path: crates/crypto/src/sign/ed25519.rs
//! Ed25519 verification for `ED`-prefixed signer keys.

use crate::error::CryptoError;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

/// Decodes the 32 raw key bytes following the `ED` prefix.
pub(crate) fn parse_key(raw: &[u8]) -> Result<VerifyingKey, CryptoError> {
    let bytes: [u8; 32] = raw
        .try_into()
        .map_err(|_| CryptoError::MalformedPublicKey("Ed25519 key must be 32 bytes".into()))?;
    VerifyingKey::from_bytes(&bytes)
        .map_err(|e| CryptoError::MalformedPublicKey(format!("not a valid Ed25519 point: {e}")))
}

/// Verifies a 64-byte Ed25519 signature over the raw message bytes.
pub(crate) fn verify(
    key: &VerifyingKey,
    message: &[u8],
    signature: &[u8],
) -> Result<(), CryptoError> {
    let sig = Signature::from_slice(signature).map_err(|e| {
        CryptoError::MalformedSignature(format!("not a 64-byte Ed25519 signature: {e}"))
    })?;
    key.verify(message, &sig)
        .map_err(|_| CryptoError::VerificationFailed("Ed25519 signature does not verify".into()))
}
