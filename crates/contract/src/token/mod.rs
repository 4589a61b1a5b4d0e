// Path: crates/contract/src/token/mod.rs

//! The URI-token adapter: mint and burn on the ledger, or simulate.
//!
//! Replicas must never mix modes within a deployment: either every replica
//! has a ledger client plus signers and goes through real submission, or
//! none do and all derive the same simulated token id from a hash of the
//! inputs. The dev-fallback flag additionally allows a failed submission to
//! degrade into a deterministic simulated id instead of failing the
//! operation.

pub mod ledger;

use ledger::{LedgerClient, LedgerError, LedgerSigner};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use xvault_types::codec::digest_str;
use xvault_types::error::VaultError;

/// How a token id was produced.
#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum TokenMode {
    /// No ledger client or no signers; the id is a hash of the inputs.
    Simulated,
    /// Really submitted and validated on the ledger.
    Submitted,
    /// Submission failed and the dev-fallback flag substituted a hash id.
    SimulatedFallback,
}

impl core::fmt::Display for TokenMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Simulated => write!(f, "simulated"),
            Self::Submitted => write!(f, "submitted"),
            Self::SimulatedFallback => write!(f, "simulated_fallback"),
        }
    }
}

/// The result of a mint or burn.
#[derive(Clone, Debug)]
pub struct TokenOutcome {
    /// The token identifier. Opaque to consumers; simulated ids are 64-hex
    /// SHA-256 digests, real ledger ids may differ.
    pub token_id: String,
    /// How the id was produced.
    pub mode: TokenMode,
    /// The validated transaction hash, for submitted outcomes.
    pub tx_hash: Option<String>,
}

/// Builds, signs, and submits URI-token transactions, or simulates them.
pub struct TokenAdapter {
    ledger: Option<Arc<dyn LedgerClient>>,
    signers: Vec<Arc<dyn LedgerSigner>>,
    dev_fallback: bool,
}

impl TokenAdapter {
    /// An adapter wired to a real ledger client and signer set.
    pub fn new(
        ledger: Option<Arc<dyn LedgerClient>>,
        signers: Vec<Arc<dyn LedgerSigner>>,
        dev_fallback: bool,
    ) -> Self {
        Self {
            ledger,
            signers,
            dev_fallback,
        }
    }

    /// An adapter that always simulates. The normal mode for local clusters.
    pub fn simulated() -> Self {
        Self {
            ledger: None,
            signers: Vec::new(),
            dev_fallback: false,
        }
    }

    /// The deterministic simulated token id:
    /// `SHA-256(issuer + ":" + (owner or empty) + ":" + uri)`.
    pub fn simulated_token_id(issuer: &str, owner: Option<&str>, uri: &str) -> String {
        digest_str(&format!("{issuer}:{}:{uri}", owner.unwrap_or("")))
    }

    /// Mints a URI token, returning the token id and how it was produced.
    pub async fn mint(
        &self,
        uri: &str,
        destination: Option<&str>,
        issuer: &str,
    ) -> Result<TokenOutcome, VaultError> {
        let ledger = match (&self.ledger, self.signers.is_empty()) {
            (Some(ledger), false) => ledger,
            _ => {
                return Ok(TokenOutcome {
                    token_id: Self::simulated_token_id(issuer, destination, uri),
                    mode: TokenMode::Simulated,
                    tx_hash: None,
                });
            }
        };

        let mut tx = json!({
            "TransactionType": "URITokenMint",
            "Account": issuer,
            "URI": hex::encode_upper(uri.as_bytes()),
            // Bit 0: burnable by the issuer.
            "Flags": 1,
        });
        if let Some(dest) = destination {
            tx["Destination"] = json!(dest);
        }

        match self.submit(ledger.as_ref(), tx).await {
            Ok((result, tx_hash)) => {
                let token_id = result
                    .pointer("/result/meta/uritoken_id")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                match token_id {
                    Some(token_id) => Ok(TokenOutcome {
                        token_id,
                        mode: TokenMode::Submitted,
                        tx_hash,
                    }),
                    None => self.fallback_or_fail(
                        Self::simulated_token_id(issuer, destination, uri),
                        LedgerError::Submission("mint result carried no uritoken_id".into()),
                    ),
                }
            }
            Err(e) => {
                self.fallback_or_fail(Self::simulated_token_id(issuer, destination, uri), e)
            }
        }
    }

    /// Burns a URI token. Symmetric to [`TokenAdapter::mint`]; the returned
    /// token id is the burned one.
    pub async fn burn(&self, token_id: &str, issuer: &str) -> Result<TokenOutcome, VaultError> {
        let ledger = match (&self.ledger, self.signers.is_empty()) {
            (Some(ledger), false) => ledger,
            _ => {
                return Ok(TokenOutcome {
                    token_id: token_id.to_string(),
                    mode: TokenMode::Simulated,
                    tx_hash: None,
                });
            }
        };

        let tx = json!({
            "TransactionType": "URITokenBurn",
            "Account": issuer,
            "URITokenID": token_id,
        });
        match self.submit(ledger.as_ref(), tx).await {
            Ok((_, tx_hash)) => Ok(TokenOutcome {
                token_id: token_id.to_string(),
                mode: TokenMode::Submitted,
                tx_hash,
            }),
            Err(e) => self.fallback_or_fail(token_id.to_string(), e),
        }
    }

    /// Autofill → per-signer blobs → combine → submit-and-wait.
    async fn submit(
        &self,
        ledger: &dyn LedgerClient,
        tx: Value,
    ) -> Result<(Value, Option<String>), LedgerError> {
        let filled = ledger.autofill(tx).await?;
        let mut blobs = Vec::with_capacity(self.signers.len());
        for signer in &self.signers {
            blobs.push(signer.sign_multi(&filled).await?);
        }
        let combined = ledger.multisign(&blobs)?;
        let result = ledger.submit_and_wait(&combined).await?;
        let tx_hash = result
            .pointer("/result/hash")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok((result, tx_hash))
    }

    fn fallback_or_fail(
        &self,
        simulated_id: String,
        error: LedgerError,
    ) -> Result<TokenOutcome, VaultError> {
        if self.dev_fallback {
            tracing::warn!(
                target: "xvault::token",
                error = %error,
                "ledger submission failed, using simulated fallback id"
            );
            Ok(TokenOutcome {
                token_id: simulated_id,
                mode: TokenMode::SimulatedFallback,
                tx_hash: None,
            })
        } else {
            Err(VaultError::XrplSubmissionFailed(error.to_string()))
        }
    }
}
