// Path: crates/contract/src/handlers/entry.rs

//! Entry handlers: `addEntry` and `getEntry`.

use super::{opt_index, opt_str, req_str, signing_fields};
use crate::dispatch::Dispatcher;
use serde_json::{json, Value};
use xvault_crypto::{validate_classic_address, verify_request};
use xvault_types::error::VaultError;
use xvault_types::validate::{
    validate_cid, validate_encrypted_blob, validate_entry_metadata, validate_wrapped_keys_shape,
};
use xvault_types::vault::{Entry, EntryMetadata, VaultType, WrappedKey};

impl Dispatcher {
    /// `addEntry`.
    ///
    /// The encrypted blob is part of the signed payload but is never
    /// persisted; the contract stores it only by its CID reference. The
    /// entry token is minted to the vault owner before the store mutation.
    pub(crate) async fn op_add_entry(
        &mut self,
        payload: &Value,
        round: &str,
    ) -> Result<Value, VaultError> {
        let vault_id = req_str(payload, "vaultId")?;
        let actor = req_str(payload, "actor")?;
        validate_classic_address(&actor)?;
        let encrypted_blob = req_str(payload, "encryptedBlob")?;
        validate_encrypted_blob(&encrypted_blob)?;
        let cid = req_str(payload, "cid")?;
        validate_cid(&cid)?;

        let raw_metadata = payload
            .get("entryMetadata")
            .cloned()
            .ok_or_else(|| VaultError::InvalidMetadata("entryMetadata is required".into()))?;
        let metadata: EntryMetadata = serde_json::from_value(raw_metadata.clone())
            .map_err(|e| VaultError::InvalidMetadata(format!("malformed entryMetadata: {e}")))?;
        validate_entry_metadata(&metadata)?;

        let raw_wrapped = payload.get("wrappedKeys").cloned().unwrap_or_else(|| json!([]));
        let wrapped_keys: Vec<WrappedKey> = serde_json::from_value(raw_wrapped.clone())
            .map_err(|e| VaultError::InvalidInput(format!("malformed wrappedKeys: {e}")))?;
        validate_wrapped_keys_shape(&wrapped_keys)?;
        for key in &wrapped_keys {
            validate_classic_address(&key.address)?;
        }

        // The preimage carries the raw payload values: reshaping them here
        // (e.g. materializing an omitted optional) would break byte-exact
        // agreement with the client's signature.
        let preimage = json!({
            "vaultId": vault_id,
            "actor": actor,
            "encryptedBlob": encrypted_blob,
            "cid": cid,
            "entryMetadata": raw_metadata,
            "wrappedKeys": raw_wrapped,
        });
        let (signature, signer_key) = signing_fields(payload)?;
        verify_request(&preimage, &signature, &signer_key, &actor)?;

        self.limiter.enforce(&actor, round)?;

        let (owner, vault_type) = {
            let vault = self.store.get(&vault_id)?;
            if !vault.has_access(&actor) {
                return Err(VaultError::Unauthorized(format!(
                    "{actor} has no write access to vault {vault_id}"
                )));
            }
            (vault.owner.clone(), vault.vault_type)
        };
        if vault_type == VaultType::Individual && !wrapped_keys.is_empty() {
            return Err(VaultError::InvalidInput(
                "wrappedKeys are not valid for individual vaults".into(),
            ));
        }

        let mint = self
            .tokens
            .mint(&format!("ipfs://{cid}"), Some(&owner), &self.config.issuer_address)
            .await?;

        let entry = Entry {
            token_id: mint.token_id.clone(),
            cid: cid.clone(),
            metadata: metadata.clone(),
            wrapped_keys,
            created_at: round.to_string(),
        };
        self.store.add_entry(&vault_id, &actor, entry)?;
        self.store.save().await?;

        Ok(json!({
            "vaultId": vault_id,
            "tokenId": mint.token_id,
            "cid": cid,
            "createdAt": round,
            "metadata": metadata,
            "mintMode": mint.mode,
        }))
    }

    /// `getEntry`: signed read; index wins when both selectors are present.
    pub(crate) fn op_get_entry(&self, payload: &Value) -> Result<Value, VaultError> {
        let vault_id = req_str(payload, "vaultId")?;
        let actor = req_str(payload, "actor")?;
        validate_classic_address(&actor)?;
        let entry_index = opt_index(payload, "entryIndex")?;
        let token_id = opt_str(payload, "tokenId")?;
        if entry_index.is_none() && token_id.is_none() {
            return Err(VaultError::InvalidInput(
                "either entryIndex or tokenId is required".into(),
            ));
        }

        // Unused selectors appear as explicit null sentinels in the preimage.
        let preimage = json!({
            "vaultId": vault_id,
            "actor": actor,
            "entryIndex": entry_index,
            "tokenId": token_id,
        });
        let (signature, signer_key) = signing_fields(payload)?;
        verify_request(&preimage, &signature, &signer_key, &actor)?;

        let entry = self
            .store
            .get_entry(&vault_id, &actor, entry_index, token_id.as_deref())?;
        let gateway_url = format!("{}/ipfs/{}", self.config.gateway_base_url, entry.cid);
        Ok(json!({
            "vaultId": vault_id,
            "tokenId": entry.token_id,
            "cid": entry.cid,
            "metadata": entry.metadata,
            "wrappedKeys": entry.wrapped_keys,
            "createdAt": entry.created_at,
            "gatewayUrl": gateway_url,
        }))
    }
}
