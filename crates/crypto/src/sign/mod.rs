// Path: crates/crypto/src/sign/mod.rs

//! Signer-key parsing and curve dispatch.
//!
//! Two key families share one interface: recognize, verify, derive address.
//! The family is decided by the leading bytes of the ASCII-hex key (`ED` for
//! Ed25519, `02`/`03` for compressed secp256k1) and modeled as a tagged
//! enum; there is no trait-object polymorphism to go wrong under consensus.

pub mod ed25519;
pub mod secp256k1;

use crate::error::CryptoError;

/// A parsed signer public key, tagged by curve family.
#[derive(Clone, Debug)]
pub enum SignerKey {
    /// `ED` prefix + 64 hex chars.
    Ed25519(ed25519_dalek::VerifyingKey),
    /// `02`/`03` prefix + 64 hex chars (SEC1 compressed point).
    Secp256k1(k256::ecdsa::VerifyingKey),
}

impl SignerKey {
    /// Parses an ASCII-hex signer key, dispatching on its prefix.
    pub fn parse(public_key: &str) -> Result<Self, CryptoError> {
        if public_key.len() != 66 {
            return Err(CryptoError::UnrecognizedKeyFamily(format!(
                "key length {} is not 66 hex chars",
                public_key.len()
            )));
        }
        let bytes = hex::decode(public_key).map_err(|e| {
            CryptoError::MalformedPublicKey(format!("key is not hex: {e}"))
        })?;
        match bytes[0] {
            0xED => ed25519::parse_key(&bytes[1..]).map(Self::Ed25519),
            0x02 | 0x03 => secp256k1::parse_key(&bytes).map(Self::Secp256k1),
            other => Err(CryptoError::UnrecognizedKeyFamily(format!(
                "unsupported key prefix {other:#04x}"
            ))),
        }
    }

    /// The 33-byte key material the ledger address is derived from.
    pub fn material(&self) -> [u8; 33] {
        let mut material = [0u8; 33];
        match self {
            Self::Ed25519(key) => {
                material[0] = 0xED;
                material[1..].copy_from_slice(&key.to_bytes());
            }
            Self::Secp256k1(key) => {
                let point = key.to_encoded_point(true);
                material.copy_from_slice(point.as_bytes());
            }
        }
        material
    }

    /// Verifies `signature` bytes over the 32-byte payload digest.
    ///
    /// Ed25519 signs the digest bytes directly; secp256k1 signs the ledger's
    /// SHA-512Half of them with a DER-encoded ECDSA signature.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        match self {
            Self::Ed25519(key) => ed25519::verify(key, message, signature),
            Self::Secp256k1(key) => secp256k1::verify(key, message, signature),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ed25519_key_hex() -> String {
        let sk = ed25519_dalek::SigningKey::from_bytes(&[7u8; 32]);
        format!("ED{}", hex::encode_upper(sk.verifying_key().to_bytes()))
    }

    #[test]
    fn recognizes_both_families_by_prefix() {
        let ed = ed25519_key_hex();
        assert!(matches!(SignerKey::parse(&ed), Ok(SignerKey::Ed25519(_))));

        // The well-known test account key is a valid secp256k1 point.
        let secp = "0330E7FC9D56BB25D6893BA3F317AE5BCF33B3291BD63DB32654A313222F7FD020";
        assert!(matches!(SignerKey::parse(secp), Ok(SignerKey::Secp256k1(_))));
    }

    #[test]
    fn rejects_unknown_prefixes_and_bad_lengths() {
        assert!(SignerKey::parse("").is_err());
        assert!(SignerKey::parse("04deadbeef").is_err());
        let bad_prefix = format!("AB{}", hex::encode([1u8; 32]));
        assert!(matches!(
            SignerKey::parse(&bad_prefix),
            Err(CryptoError::UnrecognizedKeyFamily(_))
        ));
        let not_hex = format!("ED{}", "zz".repeat(32));
        assert!(SignerKey::parse(&not_hex).is_err());
    }

    #[test]
    fn material_round_trips_the_wire_encoding() {
        let secp = "0330E7FC9D56BB25D6893BA3F317AE5BCF33B3291BD63DB32654A313222F7FD020";
        let key = SignerKey::parse(secp).unwrap();
        assert_eq!(hex::encode_upper(key.material()), secp);

        let ed = ed25519_key_hex();
        let key = SignerKey::parse(&ed).unwrap();
        assert_eq!(hex::encode_upper(key.material()), ed);
    }
}
