// Path: crates/contract/src/dispatch.rs

//! Operation classification and the outer error boundary.
//!
//! The dispatcher owns the vault store, the rate limiter, the token adapter,
//! and the audit sink as plain values wired in at bootstrap. It processes
//! one request at a time to completion; the runtime guarantees ordering
//! within a round, and replicas fed the same ordered sequence produce the
//! same state digest after every step.

use crate::audit::{AuditRecord, AuditSink, TracingAuditSink};
use crate::limiter::RateLimiter;
use crate::token::TokenAdapter;
use serde::Deserialize;
use serde_json::{json, Value};
use xvault_store::VaultStore;
use xvault_types::config::NodeConfig;
use xvault_types::error::{failure_envelope, success_envelope, ErrorCode, VaultError};
use xvault_types::vault::VaultType;

/// The dispatcher's slice of the startup configuration.
#[derive(Clone, Debug)]
pub struct ContractConfig {
    /// Base URL for `gatewayUrl` strings in responses. May be empty.
    pub gateway_base_url: String,
    /// Enables the team family of handlers.
    pub team_mode: bool,
    /// Selects `mutable_stub` vs `burn_remint` manifest updates.
    pub mutable_uri_tokens: bool,
    /// The ledger account that issues URI tokens.
    pub issuer_address: String,
}

impl From<&NodeConfig> for ContractConfig {
    fn from(cfg: &NodeConfig) -> Self {
        Self {
            gateway_base_url: cfg.gateway_base_url.clone(),
            team_mode: cfg.team_mode,
            mutable_uri_tokens: cfg.mutable_uri_tokens,
            issuer_address: cfg.issuer_address.clone(),
        }
    }
}

/// One request as delivered by the runtime: `{type, payload}`.
#[derive(Deserialize, Clone, Debug)]
pub struct Request {
    /// The operation kind.
    #[serde(rename = "type")]
    pub op: String,
    /// The operation payload; shape is per-operation.
    #[serde(default)]
    pub payload: Value,
}

/// The operation dispatcher.
pub struct Dispatcher {
    pub(crate) store: VaultStore,
    pub(crate) limiter: RateLimiter,
    pub(crate) tokens: TokenAdapter,
    pub(crate) config: ContractConfig,
    audit: Box<dyn AuditSink>,
}

impl Dispatcher {
    /// Wires a dispatcher from its collaborators.
    pub fn new(
        store: VaultStore,
        tokens: TokenAdapter,
        config: ContractConfig,
        audit: Box<dyn AuditSink>,
    ) -> Self {
        Self {
            store,
            limiter: RateLimiter::new(),
            tokens,
            config,
            audit,
        }
    }

    /// A dispatcher with the default tracing audit sink.
    pub fn with_tracing_audit(store: VaultStore, tokens: TokenAdapter, config: ContractConfig) -> Self {
        Self::new(store, tokens, config, Box::new(TracingAuditSink))
    }

    /// Read access to the store, for replica cross-check hooks.
    pub fn store(&self) -> &VaultStore {
        &self.store
    }

    /// The whole-state digest. Pure function of state.
    pub fn state_digest(&self) -> Result<String, VaultError> {
        self.store.digest()
    }

    /// Parses one raw request message and handles it.
    pub async fn handle_raw(&mut self, raw: &[u8], round_key: &str) -> Value {
        match serde_json::from_slice::<Request>(raw) {
            Ok(request) => self.handle(&request, round_key).await,
            Err(e) => {
                let err = VaultError::InvalidInput(format!("request is not valid JSON: {e}"));
                self.audit_failure("malformedRequest", round_key, &err);
                failure_envelope(&err)
            }
        }
    }

    /// Handles one request to completion and returns the response envelope.
    ///
    /// This is the single catch point: handlers fail fast with a
    /// [`VaultError`], and the conversion into the wire failure envelope
    /// (plus the audit record for either outcome) happens exactly here.
    pub async fn handle(&mut self, request: &Request, round_key: &str) -> Value {
        match self.dispatch(request, round_key).await {
            Ok(data) => {
                self.audit.record(&AuditRecord {
                    at: round_key.to_string(),
                    event: request.op.clone(),
                    success: true,
                    detail: data.clone(),
                });
                success_envelope(&request.op, data)
            }
            Err(err) => {
                tracing::warn!(
                    target: "xvault::dispatch",
                    operation = %request.op,
                    code = err.code(),
                    error = %err,
                    "operation failed"
                );
                self.audit_failure(&request.op, round_key, &err);
                failure_envelope(&err)
            }
        }
    }

    fn audit_failure(&self, event: &str, round_key: &str, err: &VaultError) {
        self.audit.record(&AuditRecord {
            at: round_key.to_string(),
            event: event.to_string(),
            success: false,
            detail: json!({"code": err.code(), "errorId": err.error_id()}),
        });
    }

    async fn dispatch(&mut self, request: &Request, round: &str) -> Result<Value, VaultError> {
        let payload = &request.payload;
        match request.op.as_str() {
            "createVault" => self.op_create_vault(payload, round, None).await,
            "createTeamVault" => {
                self.op_create_vault(payload, round, Some(VaultType::Team)).await
            }
            "inviteToVault" => {
                self.require_team_mode()?;
                self.op_invite_to_vault(payload, round).await
            }
            "acceptInvite" => {
                self.require_team_mode()?;
                self.op_accept_invite(payload, round).await
            }
            "revokeInvite" => {
                self.require_team_mode()?;
                self.op_revoke_invite(payload, round).await
            }
            "removeMember" => {
                self.require_team_mode()?;
                self.op_remove_member(payload, round).await
            }
            "getPendingInvites" => {
                self.require_team_mode()?;
                self.op_get_pending_invites(payload)
            }
            "updateVaultManifest" => {
                self.require_team_mode()?;
                self.op_update_vault_manifest(payload, round).await
            }
            "addEntry" => self.op_add_entry(payload, round).await,
            "getEntry" => self.op_get_entry(payload),
            "getMyVaults" => self.op_get_my_vaults(payload),
            "listVaultURITokens" => self.op_list_vault_uri_tokens(payload),
            "revokeVault" => self.op_revoke_vault(payload, round).await,
            "addPasswordBackup" => self.op_add_password_backup(payload, round).await,
            "removePasswordBackup" => self.op_remove_password_backup(payload, round).await,
            "getVaultMetadata" => self.op_get_vault_metadata(payload),
            "stateDigest" => self.op_state_digest(),
            other => Err(VaultError::UnknownOperation(other.to_string())),
        }
    }

    fn require_team_mode(&self) -> Result<(), VaultError> {
        if !self.config.team_mode {
            return Err(VaultError::TeamModeDisabled(
                "team operations are disabled by configuration".into(),
            ));
        }
        Ok(())
    }
}
