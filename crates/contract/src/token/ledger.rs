// Path: crates/contract/src/token/ledger.rs

//! Collaborator seams for the ledger.
//!
//! The contract core never talks to a ledger node directly; it drives these
//! traits. Real implementations live outside the core (and outside this
//! repository); tests provide mocks. The core is agnostic to everything but
//! the shapes below.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Failures surfaced by ledger collaborators.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A transaction could not be autofilled, signed, or combined.
    #[error("ledger preparation failed: {0}")]
    Preparation(String),
    /// Submission failed or the result lacked the expected fields.
    #[error("ledger submission failed: {0}")]
    Submission(String),
}

/// A connected ledger client.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fills in sequence, fee, and network fields of a transaction.
    async fn autofill(&self, tx: Value) -> Result<Value, LedgerError>;
    /// Submits a signed blob and waits for the validated result.
    async fn submit_and_wait(&self, blob: &str) -> Result<Value, LedgerError>;
    /// Issues a read request (e.g. account info).
    async fn request(&self, req: Value) -> Result<Value, LedgerError>;
    /// Combines per-signer blobs into one multi-signed blob.
    fn multisign(&self, blobs: &[String]) -> Result<String, LedgerError>;
}

/// One multi-signing participant.
#[async_trait]
pub trait LedgerSigner: Send + Sync {
    /// The signer's ledger address.
    fn address(&self) -> &str;
    /// Produces this signer's blob for a multi-signed transaction.
    async fn sign_multi(&self, tx: &Value) -> Result<String, LedgerError>;
}
