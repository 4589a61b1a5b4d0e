// Path: crates/crypto/src/sign/secp256k1.rs
//! secp256k1 ECDSA verification for compressed (`02`/`03`) signer keys.

use crate::error::CryptoError;
use crate::hash::sha512_half;
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{Signature, VerifyingKey};

/// Decodes a 33-byte SEC1 compressed point.
pub(crate) fn parse_key(sec1: &[u8]) -> Result<VerifyingKey, CryptoError> {
    VerifyingKey::from_sec1_bytes(sec1)
        .map_err(|e| CryptoError::MalformedPublicKey(format!("not a valid secp256k1 point: {e}")))
}

/// Verifies a DER-encoded ECDSA signature over SHA-512Half of the message,
/// the ledger's standard scheme for this curve.
pub(crate) fn verify(
    key: &VerifyingKey,
    message: &[u8],
    signature: &[u8],
) -> Result<(), CryptoError> {
    let sig = Signature::from_der(signature).map_err(|e| {
        CryptoError::MalformedSignature(format!("not a DER ECDSA signature: {e}"))
    })?;
    // Accept high-s encodings from older signers but verify the low-s form.
    let sig = sig.normalize_s().unwrap_or(sig);
    key.verify_prehash(&sha512_half(message), &sig)
        .map_err(|_| CryptoError::VerificationFailed("secp256k1 signature does not verify".into()))
}
