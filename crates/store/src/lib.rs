// Path: crates/store/src/lib.rs
#![forbid(unsafe_code)]

//! # XVault State Store
//!
//! The typed in-memory vault state and its invariant-enforcing mutators.
//!
//! Every mutation here is synchronous and atomic per call: a mutator either
//! applies its whole effect or returns an error having touched nothing, so
//! the dispatcher can never observe (or persist) a half-applied operation.
//! The store is the only writer of vault state; the dispatcher owns it as a
//! plain value, never as an ambient global.
//!
//! Invariants maintained after every committed operation:
//! the owner is always authorized; `authorized` and `pendingInvites` are
//! duplicate-free and disjoint; individual vaults have exactly the owner
//! authorized, no invites, and no wrapped keys; ids, owners, and salts never
//! mutate; the state digest is a pure function of the vault map.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use xvault_types::error::VaultError;
use xvault_types::vault::{
    round_key_cmp, vault_id, Entry, PendingInvite, Vault, VaultSummary, VaultType,
    META_LAST_UPDATED, META_PASSWORD_BACKUP, META_VAULT_ID,
};

pub mod persist;

pub use persist::LoadError;

/// Parameters for inserting a new vault.
pub struct NewVault {
    /// Owning ledger address.
    pub owner: String,
    /// Client-chosen id salt.
    pub salt: String,
    /// Vault kind.
    pub vault_type: VaultType,
    /// Normalized metadata (the dispatcher sets `vaultId`, `blobVersion`,
    /// `lastUpdated` before insertion).
    pub metadata: Map<String, Value>,
    /// Round key at creation.
    pub created_at: String,
    /// Manifest token from the token adapter.
    pub manifest_token_id: String,
    /// Additional authorized members (team vaults only).
    pub authorized: Vec<String>,
    /// Pre-seeded pending invites (restore flows only); entries overlapping
    /// the authorized set are dropped to keep the lists disjoint.
    pub pending_invites: Vec<PendingInvite>,
}

/// The in-memory vault map plus the path it persists to.
#[derive(Debug)]
pub struct VaultStore {
    vaults: BTreeMap<String, Vault>,
    state_file: PathBuf,
}

impl VaultStore {
    /// Creates an empty store that will persist to `state_file`.
    pub fn new(state_file: PathBuf) -> Self {
        Self {
            vaults: BTreeMap::new(),
            state_file,
        }
    }

    /// Number of vaults currently stored.
    pub fn len(&self) -> usize {
        self.vaults.len()
    }

    /// Whether the store holds no vaults.
    pub fn is_empty(&self) -> bool {
        self.vaults.is_empty()
    }

    /// Whether a vault exists under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.vaults.contains_key(id)
    }

    /// Looks up a vault, failing with `VaultNotFound`.
    pub fn get(&self, id: &str) -> Result<&Vault, VaultError> {
        self.vaults
            .get(id)
            .ok_or_else(|| VaultError::VaultNotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Vault, VaultError> {
        self.vaults
            .get_mut(id)
            .ok_or_else(|| VaultError::VaultNotFound(id.to_string()))
    }

    /// Computes the id and inserts a new vault.
    ///
    /// The authorized set is `owner ∪ authorized`, deduplicated with the
    /// owner first; individual vaults reject additional members.
    pub fn create_vault(&mut self, new: NewVault) -> Result<&Vault, VaultError> {
        let id = vault_id(&new.owner, &new.salt);
        if self.vaults.contains_key(&id) {
            return Err(VaultError::VaultAlreadyExists(id));
        }
        if new.vault_type == VaultType::Individual
            && new.authorized.iter().any(|a| a != &new.owner)
        {
            return Err(VaultError::InvalidVaultType(
                "individual vaults cannot have additional authorized members".into(),
            ));
        }

        let mut authorized = vec![new.owner.clone()];
        for address in new.authorized {
            if !authorized.contains(&address) {
                authorized.push(address);
            }
        }
        let mut pending_invites: Vec<PendingInvite> = Vec::new();
        if new.vault_type == VaultType::Team {
            for invite in new.pending_invites {
                let duplicate = pending_invites.iter().any(|i| i.address == invite.address);
                if !duplicate && !authorized.contains(&invite.address) {
                    pending_invites.push(invite);
                }
            }
        }

        let vault = Vault {
            id: id.clone(),
            vault_type: new.vault_type,
            owner: new.owner,
            salt: new.salt,
            created_at: new.created_at,
            metadata: new.metadata,
            manifest_token_id: new.manifest_token_id,
            authorized,
            pending_invites,
            entries: Vec::new(),
        };
        tracing::debug!(target: "xvault::store", vault = %id, kind = %vault.vault_type, "vault created");
        Ok(self.vaults.entry(id).or_insert(vault))
    }

    /// Appends an entry, requiring write access for `actor`.
    pub fn add_entry(
        &mut self,
        vault_id: &str,
        actor: &str,
        entry: Entry,
    ) -> Result<&Entry, VaultError> {
        let vault = self.get_mut(vault_id)?;
        if !vault.has_access(actor) {
            return Err(VaultError::Unauthorized(format!(
                "{actor} has no write access to vault {vault_id}"
            )));
        }
        vault.entries.push(entry);
        tracing::debug!(target: "xvault::store", vault = %vault_id, entries = vault.entries.len(), "entry appended");
        // Just pushed, so the vector is non-empty.
        vault
            .entries
            .last()
            .ok_or_else(|| VaultError::UnexpectedError("entry vanished after push".into()))
    }

    /// Resolves an entry by index or token id, requiring read access.
    ///
    /// Index wins when both selectors are provided; token lookup is
    /// first-match in insertion order.
    pub fn get_entry(
        &self,
        vault_id: &str,
        actor: &str,
        entry_index: Option<usize>,
        token_id: Option<&str>,
    ) -> Result<&Entry, VaultError> {
        let vault = self.get(vault_id)?;
        if !vault.has_access(actor) {
            return Err(VaultError::Unauthorized(format!(
                "{actor} has no read access to vault {vault_id}"
            )));
        }
        if let Some(index) = entry_index {
            return vault.entries.get(index).ok_or_else(|| {
                VaultError::EntryNotFound(format!("no entry at index {index}"))
            });
        }
        if let Some(token) = token_id {
            return vault
                .entries
                .iter()
                .find(|e| e.token_id == token)
                .ok_or_else(|| VaultError::EntryNotFound(format!("no entry with token {token}")));
        }
        Err(VaultError::EntryNotFound("no selector provided".into()))
    }

    /// Lists summaries of `owner`'s vaults, newest first.
    ///
    /// With `since`, only vaults created strictly after that round key are
    /// returned. Ordering is by `createdAt` descending, numeric when both
    /// sides parse as finite numbers, bytewise otherwise.
    pub fn get_my_vaults(&self, owner: &str, since: Option<&str>) -> Vec<VaultSummary> {
        let mut summaries: Vec<VaultSummary> = self
            .vaults
            .values()
            .filter(|v| v.owner == owner)
            .filter(|v| match since {
                Some(s) => round_key_cmp(&v.created_at, s) == std::cmp::Ordering::Greater,
                None => true,
            })
            .map(Vault::summary)
            .collect();
        summaries.sort_by(|a, b| round_key_cmp(&b.created_at, &a.created_at));
        summaries
    }

    /// Records a pending invite. Owner-only, team-only.
    pub fn add_pending_invite(
        &mut self,
        vault_id: &str,
        actor: &str,
        invitee: &str,
        round_key: &str,
    ) -> Result<usize, VaultError> {
        let vault = self.get_mut(vault_id)?;
        require_team(vault)?;
        require_owner(vault, actor)?;
        if vault.authorized.iter().any(|a| a == invitee) {
            return Err(VaultError::InviteAlreadyAccepted(format!(
                "{invitee} is already a member"
            )));
        }
        if vault.pending_invites.iter().any(|i| i.address == invitee) {
            return Err(VaultError::InviteAlreadyExists(format!(
                "{invitee} already has a pending invite"
            )));
        }
        vault.pending_invites.push(PendingInvite {
            address: invitee.to_string(),
            invited_by: actor.to_string(),
            invited_at: round_key.to_string(),
        });
        Ok(vault.pending_invites.len())
    }

    /// Promotes a pending invite into membership. Team-only.
    ///
    /// The actor must be the invitee; authentication upstream guarantees
    /// the caller controls that address.
    pub fn accept_pending_invite(
        &mut self,
        vault_id: &str,
        invitee: &str,
    ) -> Result<usize, VaultError> {
        let vault = self.get_mut(vault_id)?;
        require_team(vault)?;
        if vault.authorized.iter().any(|a| a == invitee) {
            return Err(VaultError::InviteAlreadyAccepted(format!(
                "{invitee} is already a member"
            )));
        }
        let position = vault
            .pending_invites
            .iter()
            .position(|i| i.address == invitee)
            .ok_or_else(|| {
                VaultError::InviteNotFound(format!("no pending invite for {invitee}"))
            })?;
        vault.pending_invites.remove(position);
        vault.authorized.push(invitee.to_string());
        tracing::debug!(target: "xvault::store", vault = %vault_id, member = %invitee, "invite accepted");
        Ok(vault.authorized.len())
    }

    /// Withdraws a pending invite. Owner-only, team-only.
    pub fn revoke_pending_invite(
        &mut self,
        vault_id: &str,
        actor: &str,
        pending_address: &str,
    ) -> Result<usize, VaultError> {
        let vault = self.get_mut(vault_id)?;
        require_team(vault)?;
        require_owner(vault, actor)?;
        let position = vault
            .pending_invites
            .iter()
            .position(|i| i.address == pending_address)
            .ok_or_else(|| {
                VaultError::InviteNotFound(format!("no pending invite for {pending_address}"))
            })?;
        vault.pending_invites.remove(position);
        Ok(vault.pending_invites.len())
    }

    /// Removes an authorized member. Owner-only, team-only; the owner cannot
    /// remove themselves.
    pub fn remove_authorized_member(
        &mut self,
        vault_id: &str,
        actor: &str,
        member: &str,
    ) -> Result<usize, VaultError> {
        let vault = self.get_mut(vault_id)?;
        require_team(vault)?;
        require_owner(vault, actor)?;
        if member == vault.owner {
            return Err(VaultError::InvalidOperation(
                "the owner cannot be removed from their own vault".into(),
            ));
        }
        let position = vault
            .authorized
            .iter()
            .position(|a| a == member)
            .ok_or_else(|| VaultError::MemberNotFound(format!("{member} is not a member")))?;
        vault.authorized.remove(position);
        tracing::debug!(target: "xvault::store", vault = %vault_id, member = %member, "member removed");
        Ok(vault.authorized.len())
    }

    /// Pending invites for a vault. Owner-only, team-only.
    pub fn get_pending_invites(
        &self,
        vault_id: &str,
        actor: &str,
    ) -> Result<&[PendingInvite], VaultError> {
        let vault = self.get(vault_id)?;
        require_team(vault)?;
        require_owner(vault, actor)?;
        Ok(&vault.pending_invites)
    }

    /// Stores the password-backup envelope in vault metadata. Owner-only.
    pub fn set_password_backup(
        &mut self,
        vault_id: &str,
        actor: &str,
        envelope: Value,
        round_key: &str,
    ) -> Result<(), VaultError> {
        let vault = self.get_mut(vault_id)?;
        require_owner(vault, actor)?;
        vault
            .metadata
            .insert(META_PASSWORD_BACKUP.to_string(), envelope);
        vault.metadata.insert(
            META_LAST_UPDATED.to_string(),
            Value::String(round_key.to_string()),
        );
        Ok(())
    }

    /// Removes the password-backup envelope. Owner-only. Returns whether one
    /// was present.
    pub fn clear_password_backup(
        &mut self,
        vault_id: &str,
        actor: &str,
        round_key: &str,
    ) -> Result<bool, VaultError> {
        let vault = self.get_mut(vault_id)?;
        require_owner(vault, actor)?;
        let removed = vault.metadata.remove(META_PASSWORD_BACKUP).is_some();
        vault.metadata.insert(
            META_LAST_UPDATED.to_string(),
            Value::String(round_key.to_string()),
        );
        Ok(removed)
    }

    /// Raw stored metadata, password backup included. Owner-only.
    pub fn get_vault_metadata(
        &self,
        vault_id: &str,
        actor: &str,
    ) -> Result<&Map<String, Value>, VaultError> {
        let vault = self.get(vault_id)?;
        require_owner(vault, actor)?;
        Ok(&vault.metadata)
    }

    /// The manifest token followed by every non-empty entry token. Owner-only.
    pub fn list_vault_uri_tokens(
        &self,
        vault_id: &str,
        actor: &str,
    ) -> Result<Vec<String>, VaultError> {
        let vault = self.get(vault_id)?;
        require_owner(vault, actor)?;
        let mut tokens = vec![vault.manifest_token_id.clone()];
        tokens.extend(
            vault
                .entries
                .iter()
                .filter(|e| !e.token_id.is_empty())
                .map(|e| e.token_id.clone()),
        );
        Ok(tokens)
    }

    /// Replaces the manifest token after a burn/remint rotation. Owner-only.
    pub fn set_manifest_token(
        &mut self,
        vault_id: &str,
        actor: &str,
        token_id: String,
    ) -> Result<(), VaultError> {
        let vault = self.get_mut(vault_id)?;
        require_owner(vault, actor)?;
        vault.manifest_token_id = token_id;
        Ok(())
    }

    /// Removes the vault and every entry in it. Owner-only.
    pub fn delete_vault(&mut self, vault_id: &str, actor: &str) -> Result<Vault, VaultError> {
        {
            let vault = self.get(vault_id)?;
            require_owner(vault, actor)?;
        }
        // Presence was checked one line above.
        self.vaults
            .remove(vault_id)
            .ok_or_else(|| VaultError::UnexpectedError("vault vanished during delete".into()))
    }

    /// Deep copy of the vault map.
    pub fn snapshot(&self) -> BTreeMap<String, Vault> {
        self.vaults.clone()
    }

    /// The whole-state digest used for replica cross-checks: the canonical
    /// digest of `{vaults}`. A pure function of state.
    pub fn digest(&self) -> Result<String, VaultError> {
        Ok(xvault_types::codec::digest_value(&persist::StateFileRef {
            vaults: &self.vaults,
        })?)
    }
}

fn require_team(vault: &Vault) -> Result<(), VaultError> {
    if vault.vault_type != VaultType::Team {
        return Err(VaultError::InvalidVaultType(format!(
            "vault {} is not a team vault",
            vault.id
        )));
    }
    Ok(())
}

fn require_owner(vault: &Vault, actor: &str) -> Result<(), VaultError> {
    if !vault.is_owner(actor) {
        return Err(VaultError::Unauthorized(format!(
            "{actor} is not the owner of vault {}",
            vault.id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xvault_types::error::ErrorCode;
    use xvault_types::vault::EntryMetadata;

    const OWNER: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
    const MEMBER: &str = "rMemberMemberMemberMemberMember";
    const STRANGER: &str = "rStrangerStrangerStrangerStran";

    fn store() -> VaultStore {
        VaultStore::new(PathBuf::from("/tmp/unused-state.json"))
    }

    fn new_vault(vault_type: VaultType, salt: &str) -> NewVault {
        NewVault {
            owner: OWNER.to_string(),
            salt: salt.to_string(),
            vault_type,
            metadata: Map::new(),
            created_at: "1".to_string(),
            manifest_token_id: "manifest-token".to_string(),
            authorized: Vec::new(),
            pending_invites: Vec::new(),
        }
    }

    fn entry(token: &str, round: &str) -> Entry {
        Entry {
            token_id: token.to_string(),
            cid: "bafybeigdyrztf4f6xsl54n4xq4m5gxezm5q4za2ojx6x7lf5y3w4f4xhqy".to_string(),
            metadata: EntryMetadata {
                service: "github".into(),
                username: Some("mike".into()),
                notes: None,
            },
            wrapped_keys: Vec::new(),
            created_at: round.to_string(),
        }
    }

    #[test]
    fn create_vault_computes_the_spec_id_and_rejects_duplicates() {
        let mut s = store();
        let id = s
            .create_vault(new_vault(VaultType::Individual, "aabbccddeeff0011"))
            .unwrap()
            .id
            .clone();
        assert_eq!(id, vault_id(OWNER, "aabbccddeeff0011"));
        let err = s
            .create_vault(new_vault(VaultType::Individual, "aabbccddeeff0011"))
            .unwrap_err();
        assert_eq!(err.code(), "VaultAlreadyExists");
    }

    #[test]
    fn create_team_vault_dedups_owner_and_initial_members() {
        let mut s = store();
        let mut new = new_vault(VaultType::Team, "aabbccddeeff0011");
        new.authorized = vec![OWNER.to_string(), MEMBER.to_string(), MEMBER.to_string()];
        let vault = s.create_vault(new).unwrap();
        assert_eq!(vault.authorized, vec![OWNER.to_string(), MEMBER.to_string()]);
    }

    #[test]
    fn individual_vault_rejects_extra_initial_members() {
        let mut s = store();
        let mut new = new_vault(VaultType::Individual, "aabbccddeeff0011");
        new.authorized = vec![MEMBER.to_string()];
        assert_eq!(s.create_vault(new).unwrap_err().code(), "InvalidVaultType");
    }

    #[test]
    fn entry_access_respects_vault_type() {
        let mut s = store();
        let id = s
            .create_vault(new_vault(VaultType::Individual, "aabbccddeeff0011"))
            .unwrap()
            .id
            .clone();
        s.add_entry(&id, OWNER, entry("tok-1", "1")).unwrap();
        assert_eq!(s.add_entry(&id, STRANGER, entry("tok-2", "1")).unwrap_err().code(), "Unauthorized");
        assert_eq!(s.get_entry(&id, STRANGER, Some(0), None).unwrap_err().code(), "Unauthorized");
        assert_eq!(s.get_entry(&id, OWNER, Some(0), None).unwrap().token_id, "tok-1");
    }

    #[test]
    fn entry_lookup_prefers_index_and_falls_back_to_token() {
        let mut s = store();
        let id = s
            .create_vault(new_vault(VaultType::Individual, "aabbccddeeff0011"))
            .unwrap()
            .id
            .clone();
        s.add_entry(&id, OWNER, entry("tok-a", "1")).unwrap();
        s.add_entry(&id, OWNER, entry("tok-b", "2")).unwrap();
        // Index wins over a conflicting token selector.
        let by_both = s.get_entry(&id, OWNER, Some(0), Some("tok-b")).unwrap();
        assert_eq!(by_both.token_id, "tok-a");
        let by_token = s.get_entry(&id, OWNER, None, Some("tok-b")).unwrap();
        assert_eq!(by_token.created_at, "2");
        assert_eq!(s.get_entry(&id, OWNER, Some(5), None).unwrap_err().code(), "EntryNotFound");
        assert_eq!(s.get_entry(&id, OWNER, None, Some("tok-z")).unwrap_err().code(), "EntryNotFound");
    }

    #[test]
    fn my_vaults_sort_numerically_descending_and_filter_by_since() {
        let mut s = store();
        for (salt, round) in [
            ("aabbccddeeff0001", "9"),
            ("aabbccddeeff0002", "10"),
            ("aabbccddeeff0003", "2"),
        ] {
            let mut nv = new_vault(VaultType::Individual, salt);
            nv.created_at = round.to_string();
            s.create_vault(nv).unwrap();
        }
        let all = s.get_my_vaults(OWNER, None);
        let rounds: Vec<&str> = all.iter().map(|v| v.created_at.as_str()).collect();
        assert_eq!(rounds, ["10", "9", "2"]);

        let since = s.get_my_vaults(OWNER, Some("2"));
        assert_eq!(since.len(), 2);
        assert!(s.get_my_vaults(STRANGER, None).is_empty());
    }

    #[test]
    fn summaries_report_entry_count_and_last_activity() {
        let mut s = store();
        let id = s
            .create_vault(new_vault(VaultType::Individual, "aabbccddeeff0011"))
            .unwrap()
            .id
            .clone();
        let before = s.get_my_vaults(OWNER, None);
        assert_eq!(before[0].entry_count, 0);
        assert_eq!(before[0].last_activity, None);
        assert!(!before[0].manifest_token_id.is_empty());

        s.add_entry(&id, OWNER, entry("tok-1", "3")).unwrap();
        let after = s.get_my_vaults(OWNER, None);
        assert_eq!(after[0].entry_count, 1);
        assert_eq!(after[0].last_activity.as_deref(), Some("3"));
    }

    #[test]
    fn invite_lifecycle_keeps_sets_disjoint() {
        let mut s = store();
        let id = s
            .create_vault(new_vault(VaultType::Team, "aabbccddeeff0011"))
            .unwrap()
            .id
            .clone();

        s.add_pending_invite(&id, OWNER, MEMBER, "2").unwrap();
        assert_eq!(
            s.add_pending_invite(&id, OWNER, MEMBER, "2").unwrap_err().code(),
            "InviteAlreadyExists"
        );

        s.accept_pending_invite(&id, MEMBER).unwrap();
        let vault = s.get(&id).unwrap();
        assert!(vault.authorized.iter().any(|a| a == MEMBER));
        assert!(vault.pending_invites.is_empty());

        // Inviting an existing member reports the acceptance, not a dup.
        assert_eq!(
            s.add_pending_invite(&id, OWNER, MEMBER, "3").unwrap_err().code(),
            "InviteAlreadyAccepted"
        );
        assert_eq!(s.accept_pending_invite(&id, MEMBER).unwrap_err().code(), "InviteAlreadyAccepted");
        assert_eq!(
            s.accept_pending_invite(&id, STRANGER).unwrap_err().code(),
            "InviteNotFound"
        );
    }

    #[test]
    fn team_mutators_are_owner_only_and_team_only() {
        let mut s = store();
        let team = s
            .create_vault(new_vault(VaultType::Team, "aabbccddeeff0011"))
            .unwrap()
            .id
            .clone();
        let solo = s
            .create_vault(new_vault(VaultType::Individual, "aabbccddeeff0022"))
            .unwrap()
            .id
            .clone();

        assert_eq!(
            s.add_pending_invite(&team, STRANGER, MEMBER, "2").unwrap_err().code(),
            "Unauthorized"
        );
        assert_eq!(
            s.add_pending_invite(&solo, OWNER, MEMBER, "2").unwrap_err().code(),
            "InvalidVaultType"
        );
        assert_eq!(
            s.revoke_pending_invite(&team, OWNER, MEMBER).unwrap_err().code(),
            "InviteNotFound"
        );
    }

    #[test]
    fn owner_cannot_be_removed_and_absent_members_are_reported() {
        let mut s = store();
        let id = s
            .create_vault(new_vault(VaultType::Team, "aabbccddeeff0011"))
            .unwrap()
            .id
            .clone();
        s.add_pending_invite(&id, OWNER, MEMBER, "2").unwrap();
        s.accept_pending_invite(&id, MEMBER).unwrap();

        assert_eq!(
            s.remove_authorized_member(&id, OWNER, OWNER).unwrap_err().code(),
            "InvalidOperation"
        );
        assert_eq!(
            s.remove_authorized_member(&id, OWNER, STRANGER).unwrap_err().code(),
            "MemberNotFound"
        );
        s.remove_authorized_member(&id, OWNER, MEMBER).unwrap();
        let vault = s.get(&id).unwrap();
        assert_eq!(vault.authorized, vec![OWNER.to_string()]);
    }

    #[test]
    fn password_backup_round_trips_through_metadata() {
        let mut s = store();
        let id = s
            .create_vault(new_vault(VaultType::Individual, "aabbccddeeff0011"))
            .unwrap()
            .id
            .clone();
        let envelope = serde_json::json!({
            "version": 1, "vaultId": id, "salt": "c2FsdA==",
            "nonce": "bm9uY2U=", "authTag": "dGFn", "ciphertext": "Y3Q=",
        });
        s.set_password_backup(&id, OWNER, envelope.clone(), "4").unwrap();
        let meta = s.get_vault_metadata(&id, OWNER).unwrap();
        assert_eq!(meta.get(META_PASSWORD_BACKUP), Some(&envelope));
        assert_eq!(meta.get(META_LAST_UPDATED), Some(&Value::String("4".into())));
        assert_eq!(s.get_vault_metadata(&id, STRANGER).unwrap_err().code(), "Unauthorized");

        assert!(s.clear_password_backup(&id, OWNER, "5").unwrap());
        assert!(!s.clear_password_backup(&id, OWNER, "6").unwrap());
    }

    #[test]
    fn token_listing_is_manifest_then_entries() {
        let mut s = store();
        let id = s
            .create_vault(new_vault(VaultType::Individual, "aabbccddeeff0011"))
            .unwrap()
            .id
            .clone();
        s.add_entry(&id, OWNER, entry("tok-1", "1")).unwrap();
        let mut empty_token = entry("", "2");
        empty_token.token_id = String::new();
        s.add_entry(&id, OWNER, empty_token).unwrap();
        s.add_entry(&id, OWNER, entry("tok-3", "3")).unwrap();

        let tokens = s.list_vault_uri_tokens(&id, OWNER).unwrap();
        assert_eq!(tokens, vec!["manifest-token", "tok-1", "tok-3"]);
        assert_eq!(s.list_vault_uri_tokens(&id, STRANGER).unwrap_err().code(), "Unauthorized");
    }

    #[test]
    fn delete_vault_removes_everything() {
        let mut s = store();
        let id = s
            .create_vault(new_vault(VaultType::Individual, "aabbccddeeff0011"))
            .unwrap()
            .id
            .clone();
        s.add_entry(&id, OWNER, entry("tok-1", "1")).unwrap();
        assert_eq!(s.delete_vault(&id, STRANGER).unwrap_err().code(), "Unauthorized");
        let removed = s.delete_vault(&id, OWNER).unwrap();
        assert_eq!(removed.entries.len(), 1);
        assert_eq!(s.get(&id).unwrap_err().code(), "VaultNotFound");
        assert!(s.get_my_vaults(OWNER, None).is_empty());
    }

    #[test]
    fn digest_is_a_pure_function_of_state() {
        let mut a = store();
        let mut b = VaultStore::new(PathBuf::from("/tmp/other-path.json"));
        for s in [&mut a, &mut b] {
            let id = s
                .create_vault(new_vault(VaultType::Team, "aabbccddeeff0011"))
                .unwrap()
                .id
                .clone();
            s.add_pending_invite(&id, OWNER, MEMBER, "2").unwrap();
            s.add_entry(&id, OWNER, entry("tok-1", "3")).unwrap();
        }
        assert_eq!(a.digest().unwrap(), b.digest().unwrap());

        // Any mutation moves the digest.
        let before = a.digest().unwrap();
        let id = vault_id(OWNER, "aabbccddeeff0011");
        a.accept_pending_invite(&id, MEMBER).unwrap();
        assert_ne!(before, a.digest().unwrap());
    }

    #[test]
    fn snapshot_is_independent_of_later_mutations() {
        let mut s = store();
        let id = s
            .create_vault(new_vault(VaultType::Individual, "aabbccddeeff0011"))
            .unwrap()
            .id
            .clone();
        let snap = s.snapshot();
        s.add_entry(&id, OWNER, entry("tok-1", "1")).unwrap();
        assert!(snap.get(&id).map(|v| v.entries.is_empty()).unwrap_or(false));
    }
}
