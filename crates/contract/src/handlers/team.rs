// Path: crates/contract/src/handlers/team.rs

//! Team-membership handlers: the invite lifecycle, member removal, and
//! manifest rotation.
//!
//! Signing preimages here are action-tagged records; the action string is
//! part of the signed bytes so a signature for one operation can never be
//! replayed as another.

use super::{opt_str, req_str, signing_fields, MANIFEST_PLACEHOLDER_URI};
use crate::dispatch::Dispatcher;
use serde_json::{json, Value};
use xvault_crypto::{authenticate, validate_classic_address, verify_request};
use xvault_types::error::VaultError;
use xvault_types::vault::VaultType;

impl Dispatcher {
    /// `inviteToVault`: owner-only; the invitee may not already be a member
    /// or already invited.
    pub(crate) async fn op_invite_to_vault(
        &mut self,
        payload: &Value,
        round: &str,
    ) -> Result<Value, VaultError> {
        let vault_id = req_str(payload, "vaultId")?;
        let invitee = req_str(payload, "invitee")?;
        validate_classic_address(&invitee)?;
        let (signature, signer_key) = signing_fields(payload)?;
        let owner = self.store.get(&vault_id)?.owner.clone();

        let preimage = json!({
            "vaultId": vault_id,
            "invitee": invitee,
            "action": "inviteToVault",
        });
        verify_request(&preimage, &signature, &signer_key, &owner)?;
        self.limiter.enforce(&owner, round)?;

        let pending_count = self
            .store
            .add_pending_invite(&vault_id, &owner, &invitee, round)?;
        self.store.save().await?;

        Ok(json!({
            "vaultId": vault_id,
            "invitee": invitee,
            "invitedAt": round,
            "pendingCount": pending_count,
        }))
    }

    /// `acceptInvite`: the expected actor is whoever signed; their address
    /// is derived from the signer key itself.
    pub(crate) async fn op_accept_invite(
        &mut self,
        payload: &Value,
        round: &str,
    ) -> Result<Value, VaultError> {
        let vault_id = req_str(payload, "vaultId")?;
        let (signature, signer_key) = signing_fields(payload)?;

        let preimage = json!({"vaultId": vault_id, "action": "acceptInvite"});
        let member = authenticate(&preimage, &signature, &signer_key)
            .map_err(VaultError::from)?;
        self.limiter.enforce(&member, round)?;

        let authorized_count = self.store.accept_pending_invite(&vault_id, &member)?;
        self.store.save().await?;

        Ok(json!({
            "vaultId": vault_id,
            "member": member,
            "authorizedCount": authorized_count,
        }))
    }

    /// `revokeInvite`: owner-only withdrawal of a pending invite.
    pub(crate) async fn op_revoke_invite(
        &mut self,
        payload: &Value,
        round: &str,
    ) -> Result<Value, VaultError> {
        let vault_id = req_str(payload, "vaultId")?;
        let pending_address = req_str(payload, "pendingAddress")?;
        let (signature, signer_key) = signing_fields(payload)?;
        let owner = self.store.get(&vault_id)?.owner.clone();

        let preimage = json!({
            "vaultId": vault_id,
            "pendingAddress": pending_address,
            "action": "revokeInvite",
        });
        verify_request(&preimage, &signature, &signer_key, &owner)?;
        self.limiter.enforce(&owner, round)?;

        let pending_count = self
            .store
            .revoke_pending_invite(&vault_id, &owner, &pending_address)?;
        self.store.save().await?;

        Ok(json!({
            "vaultId": vault_id,
            "pendingAddress": pending_address,
            "pendingCount": pending_count,
        }))
    }

    /// `removeMember`: owner-only; the owner cannot remove themselves.
    pub(crate) async fn op_remove_member(
        &mut self,
        payload: &Value,
        round: &str,
    ) -> Result<Value, VaultError> {
        let vault_id = req_str(payload, "vaultId")?;
        let member = req_str(payload, "memberToRemove")?;
        let (signature, signer_key) = signing_fields(payload)?;
        let owner = self.store.get(&vault_id)?.owner.clone();

        let preimage = json!({
            "vaultId": vault_id,
            "memberToRemove": member,
            "action": "removeMember",
        });
        verify_request(&preimage, &signature, &signer_key, &owner)?;
        self.limiter.enforce(&owner, round)?;

        let authorized_count = self
            .store
            .remove_authorized_member(&vault_id, &owner, &member)?;
        self.store.save().await?;

        Ok(json!({
            "vaultId": vault_id,
            "removed": member,
            "authorizedCount": authorized_count,
        }))
    }

    /// `getPendingInvites`: a signed, owner-only read.
    pub(crate) fn op_get_pending_invites(&self, payload: &Value) -> Result<Value, VaultError> {
        let vault_id = req_str(payload, "vaultId")?;
        let (signature, signer_key) = signing_fields(payload)?;
        let owner = self.store.get(&vault_id)?.owner.clone();

        let preimage = json!({"vaultId": vault_id, "action": "getPendingInvites"});
        verify_request(&preimage, &signature, &signer_key, &owner)?;

        let invites = self.store.get_pending_invites(&vault_id, &owner)?;
        let count = invites.len();
        Ok(json!({
            "vaultId": vault_id,
            "pendingInvites": invites,
            "count": count,
        }))
    }

    /// `updateVaultManifest`: manifest rotation after a membership change.
    ///
    /// With the mutable-URI-token flag on, the ledger is untouched and the
    /// token id is kept; otherwise the current manifest token is burned and
    /// a new one minted.
    pub(crate) async fn op_update_vault_manifest(
        &mut self,
        payload: &Value,
        round: &str,
    ) -> Result<Value, VaultError> {
        let vault_id = req_str(payload, "vaultId")?;
        let new_uri = opt_str(payload, "newUri")?;
        let new_blob_hex = opt_str(payload, "newBlobHex")?;
        if new_uri.is_none() && new_blob_hex.is_none() {
            return Err(VaultError::InvalidInput(
                "at least one of newUri or newBlobHex is required".into(),
            ));
        }
        if let Some(blob) = &new_blob_hex {
            if blob.len() % 2 != 0 || !blob.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(VaultError::InvalidInput("newBlobHex must be hex".into()));
            }
        }

        let (signature, signer_key) = signing_fields(payload)?;
        let (owner, vault_type, manifest_token) = {
            let vault = self.store.get(&vault_id)?;
            (
                vault.owner.clone(),
                vault.vault_type,
                vault.manifest_token_id.clone(),
            )
        };
        if vault_type != VaultType::Team {
            return Err(VaultError::InvalidVaultType(
                "manifest rotation applies to team vaults only".into(),
            ));
        }

        let preimage = json!({
            "vaultId": vault_id,
            "newUri": new_uri,
            "newBlobHex": new_blob_hex,
            "action": "updateVaultManifest",
        });
        verify_request(&preimage, &signature, &signer_key, &owner)?;
        self.limiter.enforce(&owner, round)?;

        if self.config.mutable_uri_tokens {
            // The token's URI is mutable in place; nothing to burn or remint.
            return Ok(json!({
                "vaultId": vault_id,
                "manifestTokenId": manifest_token,
                "mode": "mutable_stub",
            }));
        }

        let burn = self
            .tokens
            .burn(&manifest_token, &self.config.issuer_address)
            .await?;
        let uri = new_uri.unwrap_or_else(|| MANIFEST_PLACEHOLDER_URI.to_string());
        let mint = self
            .tokens
            .mint(&uri, None, &self.config.issuer_address)
            .await?;
        self.store
            .set_manifest_token(&vault_id, &owner, mint.token_id.clone())?;
        self.store.save().await?;

        Ok(json!({
            "vaultId": vault_id,
            "manifestTokenId": mint.token_id,
            "mode": "burn_remint",
            "burnMode": burn.mode,
            "mintMode": mint.mode,
        }))
    }
}
