// Path: crates/crypto/src/verifier.rs

//! The request-authentication pipeline.
//!
//! Order matters and is fixed: cheap shape gates first (so failure paths do
//! no cryptographic work and leak nothing), then key-family recognition,
//! then signer-to-address binding, then the curve verification itself over
//! the canonical payload digest. The pipeline is pure and performs no I/O;
//! a broken signature here is a complete break of the trust model, so every
//! step fails closed.

use crate::address::derive_classic_address;
use crate::error::CryptoError;
use crate::sign::SignerKey;
use serde_json::Value;
use xvault_types::codec;

/// Minimum accepted signature length in hex chars.
const MIN_SIGNATURE_HEX: usize = 16;
/// Accepted public-key length bounds in chars.
const KEY_LEN_BOUNDS: (usize, usize) = (16, 80);

/// Authenticates a signed payload and returns the signer's derived address.
///
/// Used directly by operations whose expected actor IS the signer (e.g.
/// accepting an invite); everything else goes through [`verify_request`].
pub fn authenticate(
    payload: &Value,
    signature: &str,
    signer_public_key: &str,
) -> Result<String, CryptoError> {
    let (key, address) = parse_signer(signature, signer_public_key)?;
    verify_digest(&key, payload, signature)?;
    Ok(address)
}

/// Authenticates a signed payload against an expected actor address.
pub fn verify_request(
    payload: &Value,
    signature: &str,
    signer_public_key: &str,
    expected_address: &str,
) -> Result<(), CryptoError> {
    let (key, derived) = parse_signer(signature, signer_public_key)?;
    // Bind the key to the claimed actor before verifying, so a mismatch is
    // reported as such even for otherwise-valid signatures.
    if derived != expected_address {
        return Err(CryptoError::AddressMismatch {
            derived,
            expected: expected_address.to_string(),
        });
    }
    verify_digest(&key, payload, signature)
}

/// Shape gates, key parsing, and address derivation; each request pays for
/// this exactly once.
fn parse_signer(
    signature: &str,
    signer_public_key: &str,
) -> Result<(SignerKey, String), CryptoError> {
    check_signature_shape(signature)?;
    check_key_shape(signer_public_key)?;
    let key = SignerKey::parse(signer_public_key)?;
    let address = derive_classic_address(&key.material());
    Ok((key, address))
}

/// Verifies `signature` over the 32 raw bytes of the canonical payload
/// digest with an already-parsed key.
fn verify_digest(key: &SignerKey, payload: &Value, signature: &str) -> Result<(), CryptoError> {
    let preimage = codec::to_bytes_canonical(payload)
        .map_err(|e| CryptoError::VerificationFailed(format!("payload not canonicalizable: {e}")))?;
    let message = codec::sha256_raw(&preimage);
    let sig_bytes = hex::decode(signature)
        .map_err(|e| CryptoError::MalformedSignature(format!("signature is not hex: {e}")))?;
    key.verify(&message, &sig_bytes)
}

fn check_signature_shape(signature: &str) -> Result<(), CryptoError> {
    if signature.len() < MIN_SIGNATURE_HEX {
        return Err(CryptoError::MalformedSignature(format!(
            "signature length {} below minimum {MIN_SIGNATURE_HEX}",
            signature.len()
        )));
    }
    if signature.len() % 2 != 0 || !signature.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CryptoError::MalformedSignature("signature is not hex".into()));
    }
    Ok(())
}

fn check_key_shape(key: &str) -> Result<(), CryptoError> {
    let (min, max) = KEY_LEN_BOUNDS;
    if key.len() < min || key.len() > max {
        return Err(CryptoError::MalformedPublicKey(format!(
            "key length {} outside {min}-{max}",
            key.len()
        )));
    }
    if !key.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(CryptoError::MalformedPublicKey(
            "key must be ASCII alphanumeric".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha512_half;
    use serde_json::json;

    /// A deterministic Ed25519 test signer.
    fn ed_signer(seed: u8) -> (ed25519_dalek::SigningKey, String, String) {
        let sk = ed25519_dalek::SigningKey::from_bytes(&[seed; 32]);
        let key_hex = format!("ED{}", hex::encode_upper(sk.verifying_key().to_bytes()));
        let key = SignerKey::parse(&key_hex).unwrap();
        let address = derive_classic_address(&key.material());
        (sk, key_hex, address)
    }

    fn ed_sign(sk: &ed25519_dalek::SigningKey, payload: &Value) -> String {
        use ed25519_dalek::Signer;
        let message = codec::sha256_raw(&codec::to_bytes_canonical(payload).unwrap());
        hex::encode(sk.sign(&message).to_bytes())
    }

    #[test]
    fn ed25519_request_verifies_end_to_end() {
        let (sk, key_hex, address) = ed_signer(9);
        let payload = json!({"vaultId": "abc", "action": "acceptInvite"});
        let signature = ed_sign(&sk, &payload);
        assert_eq!(authenticate(&payload, &signature, &key_hex).unwrap(), address);
        assert!(verify_request(&payload, &signature, &key_hex, &address).is_ok());
    }

    #[test]
    fn secp256k1_request_verifies_end_to_end() {
        use k256::ecdsa::signature::hazmat::PrehashSigner;
        let sk = k256::ecdsa::SigningKey::from_slice(&[3u8; 32]).unwrap();
        let point = sk.verifying_key().to_encoded_point(true);
        let key_hex = hex::encode_upper(point.as_bytes());
        let address = derive_classic_address(point.as_bytes());

        let payload = json!({"vaultId": "abc", "invitee": "rSomeone", "action": "inviteToVault"});
        let message = codec::sha256_raw(&codec::to_bytes_canonical(&payload).unwrap());
        let sig: k256::ecdsa::Signature = sk.sign_prehash(&sha512_half(&message)).unwrap();
        let signature = hex::encode(sig.to_der().as_bytes());

        assert!(verify_request(&payload, &signature, &key_hex, &address).is_ok());
    }

    #[test]
    fn signer_address_must_match_expected_actor() {
        let (sk, key_hex, _) = ed_signer(9);
        let (_, _, other_address) = ed_signer(10);
        let payload = json!({"vaultId": "abc"});
        let signature = ed_sign(&sk, &payload);
        let err = verify_request(&payload, &signature, &key_hex, &other_address).unwrap_err();
        assert!(matches!(err, CryptoError::AddressMismatch { .. }));
    }

    #[test]
    fn payload_tampering_breaks_verification() {
        let (sk, key_hex, address) = ed_signer(9);
        let payload = json!({"vaultId": "abc", "entryIndex": 0, "tokenId": null});
        let signature = ed_sign(&sk, &payload);
        let tampered = json!({"vaultId": "abc", "entryIndex": 1, "tokenId": null});
        assert!(verify_request(&tampered, &signature, &key_hex, &address).is_err());
    }

    #[test]
    fn preimage_is_key_order_independent() {
        let (sk, key_hex, address) = ed_signer(5);
        let payload = json!({"b": 2, "a": 1});
        let signature = ed_sign(&sk, &payload);
        let reordered = json!({"a": 1, "b": 2});
        assert!(verify_request(&reordered, &signature, &key_hex, &address).is_ok());
    }

    #[test]
    fn shape_gates_run_before_any_crypto() {
        let payload = json!({});
        assert!(matches!(
            authenticate(&payload, "short", "EDAB"),
            Err(CryptoError::MalformedSignature(_))
        ));
        assert!(matches!(
            authenticate(&payload, &"ab".repeat(32), "not-alnum!!"),
            Err(CryptoError::MalformedPublicKey(_))
        ));
    }
}
