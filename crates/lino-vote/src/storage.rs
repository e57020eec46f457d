// crates/lino-vote/src/storage.rs
//
// Stake ledger persistence.
//
// Key format:
//   - `vote:voter:{username}`              -> Voter
//   - `vote:delegation:{voter}:{delegator}` -> Delegation
//   - `vote:vote:{proposal}:{voter}`        -> Vote
//   - `vote:reference_list`                 -> ReferenceList

use lino_core::{AccountKey, Context, LinoError, ProposalKey};

use crate::model::{Delegation, ReferenceList, Vote, Voter};

const REFERENCE_LIST_KEY: &[u8] = b"vote:reference_list";

#[derive(Debug, Clone, Copy, Default)]
pub struct VoteStorage;

impl VoteStorage {
    pub fn new() -> Self {
        Self
    }

    fn voter_key(user: &AccountKey) -> Vec<u8> {
        format!("vote:voter:{}", user).into_bytes()
    }

    fn delegation_prefix(voter: &AccountKey) -> String {
        format!("vote:delegation:{}:", voter)
    }

    fn delegation_key(voter: &AccountKey, delegator: &AccountKey) -> Vec<u8> {
        format!("{}{}", Self::delegation_prefix(voter), delegator).into_bytes()
    }

    fn vote_prefix(proposal: &ProposalKey) -> String {
        format!("vote:vote:{}:", proposal)
    }

    fn vote_key(proposal: &ProposalKey, voter: &AccountKey) -> Vec<u8> {
        format!("{}{}", Self::vote_prefix(proposal), voter).into_bytes()
    }

    pub fn does_voter_exist(&self, ctx: &Context, user: &AccountKey) -> Result<bool, LinoError> {
        ctx.store.has(&Self::voter_key(user))
    }

    pub fn get_voter(&self, ctx: &Context, user: &AccountKey) -> Result<Voter, LinoError> {
        ctx.store
            .get_json(&Self::voter_key(user))?
            .ok_or_else(|| LinoError::VoterNotFound(user.to_string()))
    }

    pub fn set_voter(&self, ctx: &mut Context, voter: &Voter) -> Result<(), LinoError> {
        ctx.store.set_json(Self::voter_key(&voter.username), voter)
    }

    pub fn delete_voter(&self, ctx: &mut Context, user: &AccountKey) {
        ctx.store.delete(Self::voter_key(user));
    }

    pub fn does_delegation_exist(
        &self,
        ctx: &Context,
        voter: &AccountKey,
        delegator: &AccountKey,
    ) -> Result<bool, LinoError> {
        ctx.store.has(&Self::delegation_key(voter, delegator))
    }

    pub fn get_delegation(
        &self,
        ctx: &Context,
        voter: &AccountKey,
        delegator: &AccountKey,
    ) -> Result<Delegation, LinoError> {
        ctx.store
            .get_json(&Self::delegation_key(voter, delegator))?
            .ok_or_else(|| LinoError::DelegationNotFound(format!("{} -> {}", delegator, voter)))
    }

    pub fn set_delegation(
        &self,
        ctx: &mut Context,
        voter: &AccountKey,
        delegation: &Delegation,
    ) -> Result<(), LinoError> {
        ctx.store
            .set_json(Self::delegation_key(voter, &delegation.delegator), delegation)
    }

    pub fn delete_delegation(&self, ctx: &mut Context, voter: &AccountKey, delegator: &AccountKey) {
        ctx.store.delete(Self::delegation_key(voter, delegator));
    }

    /// Every live delegation to `voter`, ordered by delegator name.
    pub fn get_all_delegations(&self, ctx: &Context, voter: &AccountKey) -> Result<Vec<Delegation>, LinoError> {
        ctx.store
            .scan_prefix(Self::delegation_prefix(voter).as_bytes())?
            .into_iter()
            .map(|(_, value)| serde_json::from_slice(&value).map_err(LinoError::from))
            .collect()
    }

    pub fn does_vote_exist(&self, ctx: &Context, proposal: &ProposalKey, voter: &AccountKey) -> Result<bool, LinoError> {
        ctx.store.has(&Self::vote_key(proposal, voter))
    }

    pub fn get_vote(&self, ctx: &Context, proposal: &ProposalKey, voter: &AccountKey) -> Result<Vote, LinoError> {
        ctx.store
            .get_json(&Self::vote_key(proposal, voter))?
            .ok_or_else(|| LinoError::VoteNotFound(format!("{} on {}", voter, proposal)))
    }

    pub fn set_vote(&self, ctx: &mut Context, proposal: &ProposalKey, vote: &Vote) -> Result<(), LinoError> {
        ctx.store.set_json(Self::vote_key(proposal, &vote.voter), vote)
    }

    /// Every vote cast on `proposal`, ordered by voter name.
    pub fn get_all_votes(&self, ctx: &Context, proposal: &ProposalKey) -> Result<Vec<Vote>, LinoError> {
        ctx.store
            .scan_prefix(Self::vote_prefix(proposal).as_bytes())?
            .into_iter()
            .map(|(_, value)| serde_json::from_slice(&value).map_err(LinoError::from))
            .collect()
    }

    pub fn get_reference_list(&self, ctx: &Context) -> Result<ReferenceList, LinoError> {
        Ok(ctx.store.get_json(REFERENCE_LIST_KEY)?.unwrap_or_default())
    }

    pub fn set_reference_list(&self, ctx: &mut Context, list: &ReferenceList) -> Result<(), LinoError> {
        ctx.store.set_json(REFERENCE_LIST_KEY.to_vec(), list)
    }
}
