// Path: crates/crypto/src/address.rs

//! Ledger classic-address derivation and validation.
//!
//! This is the single deterministic function binding a signer public key to
//! an on-ledger identity, used by every authenticated operation: the address
//! is the base58 (Ripple alphabet) encoding of a version byte, the
//! RIPEMD160-of-SHA256 account id of the key material, and a 4-byte
//! double-SHA256 checksum.

use crate::error::CryptoError;
use crate::hash::{account_id_digest, double_sha256};

/// Version byte for classic account addresses.
const ACCOUNT_ID_VERSION: u8 = 0x00;
/// A decoded classic address: version + 20-byte account id + 4-byte checksum.
const DECODED_ADDRESS_LEN: usize = 25;

/// Derives the classic address for a signer key's 33-byte material.
pub fn derive_classic_address(key_material: &[u8]) -> String {
    let account_id = account_id_digest(key_material);
    let mut payload = Vec::with_capacity(DECODED_ADDRESS_LEN);
    payload.push(ACCOUNT_ID_VERSION);
    payload.extend_from_slice(&account_id);
    let checksum = double_sha256(&payload);
    payload.extend_from_slice(&checksum[..4]);
    bs58::encode(payload)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .into_string()
}

/// Validates a classic address: length, alphabet, version byte, checksum.
pub fn validate_classic_address(address: &str) -> Result<(), CryptoError> {
    if !(25..=40).contains(&address.len()) {
        return Err(CryptoError::InvalidAddress(format!(
            "address length {} outside 25-40",
            address.len()
        )));
    }
    let decoded = bs58::decode(address)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .into_vec()
        .map_err(|e| CryptoError::InvalidAddress(format!("base58 decode failed: {e}")))?;
    if decoded.len() != DECODED_ADDRESS_LEN {
        return Err(CryptoError::InvalidAddress(format!(
            "decoded address is {} bytes, expected {DECODED_ADDRESS_LEN}",
            decoded.len()
        )));
    }
    if decoded[0] != ACCOUNT_ID_VERSION {
        return Err(CryptoError::InvalidAddress(format!(
            "unexpected version byte {:#04x}",
            decoded[0]
        )));
    }
    let (body, checksum) = decoded.split_at(DECODED_ADDRESS_LEN - 4);
    if &double_sha256(body)[..4] != checksum {
        return Err(CryptoError::InvalidAddress("checksum mismatch".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // The well-known test account: secp256k1 public key of the seed
    // snoPBrXtMeMyMHUVTgbuqAfg1SUTb.
    const GENESIS_PUBKEY_HEX: &str =
        "0330E7FC9D56BB25D6893BA3F317AE5BCF33B3291BD63DB32654A313222F7FD020";
    const GENESIS_ADDRESS: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

    #[test]
    fn derives_the_known_test_account_address() {
        let material = hex::decode(GENESIS_PUBKEY_HEX).unwrap();
        assert_eq!(derive_classic_address(&material), GENESIS_ADDRESS);
    }

    #[test]
    fn derived_addresses_validate() {
        let material = hex::decode(GENESIS_PUBKEY_HEX).unwrap();
        let address = derive_classic_address(&material);
        assert!(validate_classic_address(&address).is_ok());
    }

    #[test]
    fn rejects_bad_checksum_and_shape() {
        // Flip the last character to another alphabet member.
        let mut corrupted: Vec<char> = GENESIS_ADDRESS.chars().collect();
        let last = corrupted.len() - 1;
        corrupted[last] = if corrupted[last] == 'h' { 'j' } else { 'h' };
        let corrupted: String = corrupted.into_iter().collect();
        assert!(validate_classic_address(&corrupted).is_err());

        assert!(validate_classic_address("too-short").is_err());
        assert!(validate_classic_address("").is_err());
        // 'l' and '0' are outside the Ripple base58 alphabet.
        assert!(validate_classic_address("rl0000000000000000000000000").is_err());
    }
}
