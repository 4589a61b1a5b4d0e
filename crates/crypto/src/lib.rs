// Path: crates/crypto/src/lib.rs
//! # XVault Crypto Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free code. Panics are disallowed in non-test code to promote
//! robust error handling.
#![cfg_attr(
    not(test),
    deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]
//! # XVault Cryptography
//!
//! Request authentication for the contract core: canonical-digest signing
//! preimages, Ed25519/secp256k1 verification, and signer-to-address binding.
//! Everything here is pure; a replica's verdict on a signature depends only
//! on the request bytes.

pub mod address;
pub mod error;
pub mod hash;
pub mod sign;
pub mod verifier;

pub use address::{derive_classic_address, validate_classic_address};
pub use error::CryptoError;
pub use verifier::{authenticate, verify_request};
