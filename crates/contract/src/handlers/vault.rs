// Path: crates/contract/src/handlers/vault.rs

//! Vault-lifecycle handlers: create, list, metadata, token listing, and
//! revocation.

use super::{
    opt_bool, opt_str, preimage_without_signing, req_str, signing_fields,
    MANIFEST_PLACEHOLDER_URI,
};
use crate::dispatch::Dispatcher;
use serde_json::{json, Map, Value};
use xvault_crypto::{validate_classic_address, verify_request};
use xvault_store::NewVault;
use xvault_types::error::VaultError;
use xvault_types::validate::{validate_password_backup, validate_salt};
use xvault_types::vault::{
    vault_id, VaultType, META_BLOB_VERSION, META_LAST_UPDATED, META_PASSWORD_BACKUP, META_VAULT_ID,
};
use xvault_types::MAX_INITIAL_AUTHORIZED;

impl Dispatcher {
    /// `createVault` / `createTeamVault`.
    ///
    /// Mints the manifest token before inserting the vault: the ledger is
    /// the source of truth for tokens, and a minted-but-uninserted token is
    /// acceptable where the reverse is not.
    pub(crate) async fn op_create_vault(
        &mut self,
        payload: &Value,
        round: &str,
        forced_type: Option<VaultType>,
    ) -> Result<Value, VaultError> {
        let owner = req_str(payload, "owner")?;
        validate_classic_address(&owner)?;
        let salt = req_str(payload, "salt")?;
        validate_salt(&salt)?;

        let vault_type = match forced_type {
            Some(t) => t,
            None => match payload.get("type") {
                None | Some(Value::Null) => VaultType::Individual,
                Some(Value::String(s)) => match s.as_str() {
                    "individual" => VaultType::Individual,
                    "team" => VaultType::Team,
                    other => {
                        return Err(VaultError::UnsupportedVaultType(other.to_string()));
                    }
                },
                Some(_) => {
                    return Err(VaultError::UnsupportedVaultType(
                        "type must be a string".into(),
                    ))
                }
            },
        };
        if vault_type == VaultType::Team && !self.config.team_mode {
            return Err(VaultError::TeamModeDisabled(
                "team vault creation is disabled by configuration".into(),
            ));
        }

        let mut metadata: Map<String, Value> = match payload.get("metadata") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(m)) => m.clone(),
            Some(_) => {
                return Err(VaultError::InvalidMetadata("metadata must be an object".into()))
            }
        };

        let initial_authorized = match (vault_type, payload.get("initialAuthorized")) {
            (_, None) | (_, Some(Value::Null)) => Vec::new(),
            (VaultType::Individual, Some(_)) => {
                return Err(VaultError::InvalidInput(
                    "initialAuthorized is only valid for team vaults".into(),
                ))
            }
            (VaultType::Team, Some(Value::Array(items))) => {
                if items.len() > MAX_INITIAL_AUTHORIZED {
                    return Err(VaultError::InvalidInput(format!(
                        "initialAuthorized has {} entries, limit is {MAX_INITIAL_AUTHORIZED}",
                        items.len()
                    )));
                }
                let mut members = Vec::with_capacity(items.len());
                for item in items {
                    let Value::String(address) = item else {
                        return Err(VaultError::InvalidInput(
                            "initialAuthorized entries must be strings".into(),
                        ));
                    };
                    validate_classic_address(address)?;
                    members.push(address.clone());
                }
                members
            }
            (VaultType::Team, Some(_)) => {
                return Err(VaultError::InvalidInput(
                    "initialAuthorized must be an array".into(),
                ))
            }
        };

        let id = vault_id(&owner, &salt);
        if let Some(meta_id) = metadata.get(META_VAULT_ID) {
            if meta_id.as_str() != Some(id.as_str()) {
                return Err(VaultError::InvalidMetadata(
                    "metadata vaultId does not match the computed vault id".into(),
                ));
            }
        }
        if let Some(backup) = metadata.get(META_PASSWORD_BACKUP) {
            validate_password_backup(backup, &id)?;
        }

        let (signature, signer_key) = signing_fields(payload)?;
        let preimage = preimage_without_signing(payload)?;
        verify_request(&preimage, &signature, &signer_key, &owner)?;

        self.limiter.enforce(&owner, round)?;

        // Check before minting so a duplicate create never touches the ledger.
        if self.store.contains(&id) {
            return Err(VaultError::VaultAlreadyExists(id));
        }

        let mint = self
            .tokens
            .mint(MANIFEST_PLACEHOLDER_URI, None, &self.config.issuer_address)
            .await?;

        metadata.insert(META_VAULT_ID.to_string(), json!(id));
        if !metadata.contains_key(META_BLOB_VERSION) {
            metadata.insert(META_BLOB_VERSION.to_string(), json!(1));
        }
        metadata.insert(META_LAST_UPDATED.to_string(), json!(round));

        let vault = self.store.create_vault(NewVault {
            owner: owner.clone(),
            salt,
            vault_type,
            metadata,
            created_at: round.to_string(),
            manifest_token_id: mint.token_id.clone(),
            authorized: initial_authorized,
            pending_invites: Vec::new(),
        })?;
        let authorized_count = vault.authorized.len();
        self.store.save().await?;

        let mut data = json!({
            "vaultId": id,
            "owner": owner,
            "createdAt": round,
            "manifestTokenId": mint.token_id,
            "mintMode": mint.mode,
        });
        if vault_type == VaultType::Team {
            data["type"] = json!("team");
            data["authorizedCount"] = json!(authorized_count);
        }
        Ok(data)
    }

    /// `getMyVaults`: the only unsigned listing; returns summaries only.
    pub(crate) fn op_get_my_vaults(&self, payload: &Value) -> Result<Value, VaultError> {
        let owner = req_str(payload, "owner")?;
        validate_classic_address(&owner)?;
        let since = opt_str(payload, "since")?;
        let vaults = self.store.get_my_vaults(&owner, since.as_deref());
        let count = vaults.len();
        Ok(json!({"vaults": vaults, "count": count}))
    }

    /// `listVaultURITokens`: signed, owner-only.
    pub(crate) fn op_list_vault_uri_tokens(&self, payload: &Value) -> Result<Value, VaultError> {
        let vault_id = req_str(payload, "vaultId")?;
        let (signature, signer_key) = signing_fields(payload)?;
        let owner = self.store.get(&vault_id)?.owner.clone();
        let preimage = json!({"vaultId": vault_id, "action": "listVaultURITokens"});
        verify_request(&preimage, &signature, &signer_key, &owner)?;

        let tokens = self.store.list_vault_uri_tokens(&vault_id, &owner)?;
        let count = tokens.len();
        Ok(json!({"vaultId": vault_id, "tokens": tokens, "count": count}))
    }

    /// `revokeVault`: burns every token, then deletes the vault and all its
    /// entries. Team vaults require `confirm=true`.
    pub(crate) async fn op_revoke_vault(
        &mut self,
        payload: &Value,
        round: &str,
    ) -> Result<Value, VaultError> {
        let vault_id = req_str(payload, "vaultId")?;
        let confirm = opt_bool(payload, "confirm")?.unwrap_or(false);
        let (signature, signer_key) = signing_fields(payload)?;
        let (owner, vault_type) = {
            let vault = self.store.get(&vault_id)?;
            (vault.owner.clone(), vault.vault_type)
        };

        let preimage = json!({"vaultId": vault_id, "confirm": confirm, "action": "revokeVault"});
        verify_request(&preimage, &signature, &signer_key, &owner)?;
        self.limiter.enforce(&owner, round)?;

        if vault_type == VaultType::Team && !confirm {
            return Err(VaultError::ConfirmationRequired(
                "revoking a team vault requires confirm=true".into(),
            ));
        }

        let tokens = self.store.list_vault_uri_tokens(&vault_id, &owner)?;
        for token in &tokens {
            self.tokens.burn(token, &self.config.issuer_address).await?;
        }
        self.store.delete_vault(&vault_id, &owner)?;
        self.store.save().await?;

        tracing::info!(
            target: "xvault::dispatch",
            vault = %vault_id,
            burned = tokens.len(),
            "vault revoked"
        );
        Ok(json!({"vaultId": vault_id, "burnedTokens": tokens.len()}))
    }

    /// `addPasswordBackup`: owner-only metadata write.
    pub(crate) async fn op_add_password_backup(
        &mut self,
        payload: &Value,
        round: &str,
    ) -> Result<Value, VaultError> {
        let vault_id = req_str(payload, "vaultId")?;
        let envelope = payload
            .get("passwordBackup")
            .filter(|v| v.is_object())
            .cloned()
            .ok_or_else(|| {
                VaultError::InvalidInput("passwordBackup envelope is required".into())
            })?;

        let owner = self.store.get(&vault_id)?.owner.clone();
        validate_password_backup(&envelope, &vault_id)?;

        let (signature, signer_key) = signing_fields(payload)?;
        let preimage = json!({
            "vaultId": vault_id,
            "passwordBackup": envelope,
            "action": "addPasswordBackup",
        });
        verify_request(&preimage, &signature, &signer_key, &owner)?;
        self.limiter.enforce(&owner, round)?;

        self.store
            .set_password_backup(&vault_id, &owner, envelope, round)?;
        self.store.save().await?;
        Ok(json!({"vaultId": vault_id, "updatedAt": round}))
    }

    /// `removePasswordBackup`: owner-only metadata write.
    pub(crate) async fn op_remove_password_backup(
        &mut self,
        payload: &Value,
        round: &str,
    ) -> Result<Value, VaultError> {
        let vault_id = req_str(payload, "vaultId")?;
        let owner = self.store.get(&vault_id)?.owner.clone();

        let (signature, signer_key) = signing_fields(payload)?;
        let preimage = json!({"vaultId": vault_id, "action": "removePasswordBackup"});
        verify_request(&preimage, &signature, &signer_key, &owner)?;
        self.limiter.enforce(&owner, round)?;

        let removed = self.store.clear_password_backup(&vault_id, &owner, round)?;
        self.store.save().await?;
        Ok(json!({"vaultId": vault_id, "removed": removed, "updatedAt": round}))
    }

    /// `getVaultMetadata`: signed, owner-only; returns raw stored metadata,
    /// password backup included. Callers are trusted.
    pub(crate) fn op_get_vault_metadata(&self, payload: &Value) -> Result<Value, VaultError> {
        let vault_id = req_str(payload, "vaultId")?;
        let owner = self.store.get(&vault_id)?.owner.clone();

        let (signature, signer_key) = signing_fields(payload)?;
        let preimage = json!({"vaultId": vault_id, "action": "getVaultMetadata"});
        verify_request(&preimage, &signature, &signer_key, &owner)?;

        let metadata = self.store.get_vault_metadata(&vault_id, &owner)?;
        Ok(json!({"vaultId": vault_id, "metadata": metadata}))
    }

    /// `stateDigest`: unsigned replica cross-check hook.
    pub(crate) fn op_state_digest(&self) -> Result<Value, VaultError> {
        Ok(json!({"digest": self.store.digest()?}))
    }
}
