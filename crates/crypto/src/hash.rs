// Path: crates/crypto/src/hash.rs
//! Digest primitives shared by address derivation and signature verification.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

/// SHA-256.
pub fn sha256(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

/// SHA-256 applied twice; the ledger's checksum digest.
pub fn double_sha256(bytes: &[u8]) -> [u8; 32] {
    sha256(&sha256(bytes))
}

/// RIPEMD-160 over SHA-256; the ledger's account-id digest.
pub fn account_id_digest(bytes: &[u8]) -> [u8; 20] {
    Ripemd160::digest(sha256(bytes)).into()
}

/// The first half of SHA-512; the ledger's signing digest for secp256k1.
pub fn sha512_half(bytes: &[u8]) -> [u8; 32] {
    let full: [u8; 64] = Sha512::digest(bytes).into();
    let mut half = [0u8; 32];
    half.copy_from_slice(&full[..32]);
    half
}
