// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # XVault Types
//!
//! This crate is the foundational library for the XVault contract core,
//! containing the canonical codec, the vault data model, configuration
//! objects, and every error kind that crosses the wire.
//!
//! ## Architectural Role
//!
//! As the base crate, `xvault-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. This structure prevents
//! circular dependencies and provides a stable, canonical definition for
//! shared types like `Vault`, `Entry`, and the `VaultError` kinds.
//!
//! Everything here is deterministic: the codec produces one byte string per
//! semantic value, and the data model serializes the same way on every
//! replica. The only I/O in this crate is the one-shot startup config read.

/// The maximum decoded size in bytes of a client-submitted encrypted blob.
pub const MAX_ENCRYPTED_BLOB_BYTES: usize = 1024 * 1024; // 1 MiB
/// The maximum number of wrapped keys accepted on a single entry.
pub const MAX_WRAPPED_KEYS: usize = 200;
/// The maximum number of addresses accepted in `initialAuthorized`.
pub const MAX_INITIAL_AUTHORIZED: usize = 50;

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::VaultError> = std::result::Result<T, E>;

/// The canonical, deterministic JSON codec and SHA-256 digests.
pub mod codec;
/// Process-wide startup configuration.
pub mod config;
/// A unified set of all error types used across the contract core.
pub mod error;
/// Shape validation for client-supplied fields (salts, CIDs, base64, envelopes).
pub mod validate;
/// The vault / entry / invite data model.
pub mod vault;
