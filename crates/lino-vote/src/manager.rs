// crates/lino-vote/src/manager.rs
//
// Vote manager: business rules over the stake ledger.
//
// Voter lifecycle:
//   Absent -> Registered(deposit >= voter_min_deposit) -> Registered(updated)* -> Absent
//
// A voter whose deposit reaches zero is deleted rather than kept as a zero
// record. Every operation validates all of its preconditions before staging
// any write, and all writes of one operation land in the same message
// context, so a voter and its delegation are always persisted together.

use std::collections::BTreeSet;

use lino_core::{
    AccountKey, Coin, Context, LinoError, PenaltyList, ProposalKey, ProposalType, StakeLedger,
};

use crate::model::{Delegation, ReferenceList, Vote, Voter};
use crate::storage::VoteStorage;

#[derive(Debug, Clone, Copy, Default)]
pub struct VoteManager {
    storage: VoteStorage,
}

impl VoteManager {
    pub fn new() -> Self {
        Self {
            storage: VoteStorage::new(),
        }
    }

    pub fn does_voter_exist(&self, ctx: &Context, user: &AccountKey) -> Result<bool, LinoError> {
        self.storage.does_voter_exist(ctx, user)
    }

    pub fn does_vote_exist(&self, ctx: &Context, proposal: &ProposalKey, voter: &AccountKey) -> Result<bool, LinoError> {
        self.storage.does_vote_exist(ctx, proposal, voter)
    }

    pub fn does_delegation_exist(
        &self,
        ctx: &Context,
        voter: &AccountKey,
        delegator: &AccountKey,
    ) -> Result<bool, LinoError> {
        self.storage.does_delegation_exist(ctx, voter, delegator)
    }

    pub fn get_voter(&self, ctx: &Context, user: &AccountKey) -> Result<Voter, LinoError> {
        self.storage.get_voter(ctx, user)
    }

    pub fn get_delegation(
        &self,
        ctx: &Context,
        voter: &AccountKey,
        delegator: &AccountKey,
    ) -> Result<Delegation, LinoError> {
        self.storage.get_delegation(ctx, voter, delegator)
    }

    /// Whether `user` is in the registered validator list.
    pub fn is_in_validator_list(&self, ctx: &Context, user: &AccountKey) -> Result<bool, LinoError> {
        let list = self.storage.get_reference_list(ctx)?;
        Ok(list.all_validators.contains(user))
    }

    /// A voter withdraw is legal when the voter is not a validator, the amount
    /// is at least `voter_min_withdraw`, and the remaining deposit stays at or
    /// above `voter_min_deposit`.
    pub fn is_legal_voter_withdraw(&self, ctx: &Context, user: &AccountKey, coin: Coin) -> Result<bool, LinoError> {
        let voter = match self.storage.get_voter(ctx, user) {
            Ok(voter) => voter,
            Err(LinoError::VoterNotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };
        if self.is_in_validator_list(ctx, user)? {
            return Ok(false);
        }
        let param = &ctx.params.vote;
        if !coin.is_gte(param.voter_min_withdraw) || !voter.deposit.is_gte(coin) {
            return Ok(false);
        }
        let remaining = voter.deposit.minus(coin)?;
        Ok(remaining.is_gte(param.voter_min_deposit))
    }

    /// A delegator withdraw is legal when the amount is at least
    /// `delegator_min_withdraw` and does not exceed the delegation.
    pub fn is_legal_delegator_withdraw(
        &self,
        ctx: &Context,
        voter: &AccountKey,
        delegator: &AccountKey,
        coin: Coin,
    ) -> Result<bool, LinoError> {
        let delegation = match self.storage.get_delegation(ctx, voter, delegator) {
            Ok(delegation) => delegation,
            Err(LinoError::DelegationNotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };
        if !coin.is_gte(ctx.params.vote.delegator_min_withdraw) {
            return Ok(false);
        }
        Ok(delegation.amount.is_gte(coin))
    }

    /// Deposit alone (not delegated power) decides validator eligibility.
    pub fn can_become_validator(&self, ctx: &Context, user: &AccountKey) -> Result<bool, LinoError> {
        let voter = match self.storage.get_voter(ctx, user) {
            Ok(voter) => voter,
            Err(LinoError::VoterNotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };
        Ok(voter
            .deposit
            .is_gte(ctx.params.validator.validator_min_voting_deposit))
    }

    /// Cast a vote, snapshotting the voter's current voting power.
    ///
    /// # Errors
    /// `VoteAlreadyExists` on a second vote for the same proposal;
    /// `VoterNotFound` if `voter` has no stake.
    pub fn add_vote(
        &self,
        ctx: &mut Context,
        proposal: &ProposalKey,
        voter: &AccountKey,
        result: bool,
    ) -> Result<(), LinoError> {
        if self.storage.does_vote_exist(ctx, proposal, voter)? {
            return Err(LinoError::VoteAlreadyExists(format!("{} on {}", voter, proposal)));
        }
        let voting_power = self.get_voting_power(ctx, voter)?;
        let vote = Vote {
            voter: voter.clone(),
            result,
            voting_power,
        };
        tracing::debug!("{} voted {} on {} with power {}", voter, result, proposal, voting_power);
        self.storage.set_vote(ctx, proposal, &vote)
    }

    pub fn get_vote(&self, ctx: &Context, proposal: &ProposalKey, voter: &AccountKey) -> Result<Vote, LinoError> {
        self.storage.get_vote(ctx, proposal, voter)
    }

    /// Delegate `coin` from `delegator` to `voter`.
    pub fn add_delegation(
        &self,
        ctx: &mut Context,
        voter_name: &AccountKey,
        delegator: &AccountKey,
        coin: Coin,
    ) -> Result<(), LinoError> {
        if coin.is_zero() {
            return Err(LinoError::InvalidCoin("delegation must be positive".to_string()));
        }
        let mut voter = self.storage.get_voter(ctx, voter_name)?;
        let mut delegation = match self.storage.get_delegation(ctx, voter_name, delegator) {
            Ok(delegation) => delegation,
            Err(LinoError::DelegationNotFound(_)) => Delegation {
                delegator: delegator.clone(),
                amount: Coin::zero(),
            },
            Err(e) => return Err(e),
        };
        voter.delegated_power = voter.delegated_power.plus(coin)?;
        delegation.amount = delegation.amount.plus(coin)?;

        self.storage.set_delegation(ctx, voter_name, &delegation)?;
        self.storage.set_voter(ctx, &voter)?;
        tracing::debug!("{} delegated {} to {}", delegator, coin, voter_name);
        Ok(())
    }

    /// Register a new voter with an initial deposit.
    ///
    /// # Errors
    /// `InsufficientDeposit` if `coin` is below `voter_min_deposit`.
    pub fn add_voter(&self, ctx: &mut Context, user: &AccountKey, coin: Coin) -> Result<(), LinoError> {
        let min = ctx.params.vote.voter_min_deposit;
        if !coin.is_gte(min) || coin.is_zero() {
            return Err(LinoError::InsufficientDeposit(format!(
                "voter deposit {} is below minimum {}",
                coin, min
            )));
        }
        let voter = Voter {
            username: user.clone(),
            deposit: coin,
            delegated_power: Coin::zero(),
        };
        tracing::debug!("Registered voter {} with deposit {}", user, coin);
        self.storage.set_voter(ctx, &voter)
    }

    /// Add to an existing voter's deposit.
    pub fn deposit(&self, ctx: &mut Context, user: &AccountKey, coin: Coin) -> Result<(), LinoError> {
        let mut voter = self.storage.get_voter(ctx, user)?;
        voter.deposit = voter.deposit.plus(coin)?;
        self.storage.set_voter(ctx, &voter)
    }

    /// Withdraw `coin` from a voter's deposit, deleting the voter when the
    /// deposit reaches zero.
    ///
    /// Legality (`is_legal_voter_withdraw`) is the caller's responsibility.
    /// A voter that still holds delegated power cannot be emptied: its
    /// delegations must be withdrawn first.
    pub fn voter_withdraw(&self, ctx: &mut Context, user: &AccountKey, coin: Coin) -> Result<(), LinoError> {
        if coin.is_zero() {
            return Err(LinoError::InvalidCoin("withdraw must be positive".to_string()));
        }
        let mut voter = self.storage.get_voter(ctx, user)?;
        voter.deposit = voter.deposit.minus(coin)?;

        if voter.deposit.is_zero() {
            if !voter.delegated_power.is_zero() {
                return Err(LinoError::IllegalWithdraw(format!(
                    "{} still holds {} delegated power",
                    user, voter.delegated_power
                )));
            }
            tracing::debug!("Voter {} withdrew everything and was removed", user);
            self.storage.delete_voter(ctx, user);
            Ok(())
        } else {
            self.storage.set_voter(ctx, &voter)
        }
    }

    /// Withdraw the voter's whole deposit. Returns the amount withdrawn.
    ///
    /// # Errors
    /// `IllegalWithdraw` while the voter still holds delegated power.
    pub fn voter_withdraw_all(&self, ctx: &mut Context, user: &AccountKey) -> Result<Coin, LinoError> {
        let voter = self.storage.get_voter(ctx, user)?;
        self.voter_withdraw(ctx, user, voter.deposit)?;
        Ok(voter.deposit)
    }

    /// Withdraw `coin` of `delegator`'s delegation to `voter`, deleting the
    /// delegation when it reaches zero.
    ///
    /// Legality (`is_legal_delegator_withdraw`) is the caller's responsibility.
    pub fn delegator_withdraw(
        &self,
        ctx: &mut Context,
        voter_name: &AccountKey,
        delegator: &AccountKey,
        coin: Coin,
    ) -> Result<(), LinoError> {
        if coin.is_zero() {
            return Err(LinoError::InvalidCoin("withdraw must be positive".to_string()));
        }
        let mut voter = self.storage.get_voter(ctx, voter_name)?;
        let mut delegation = self.storage.get_delegation(ctx, voter_name, delegator)?;
        voter.delegated_power = voter.delegated_power.minus(coin)?;
        delegation.amount = delegation.amount.minus(coin)?;

        self.storage.set_voter(ctx, &voter)?;
        if delegation.amount.is_zero() {
            self.storage.delete_delegation(ctx, voter_name, delegator);
        } else {
            self.storage.set_delegation(ctx, voter_name, &delegation)?;
        }
        tracing::debug!("{} withdrew {} of delegation to {}", delegator, coin, voter_name);
        Ok(())
    }

    /// Withdraw the whole delegation. Returns the amount withdrawn.
    pub fn delegator_withdraw_all(
        &self,
        ctx: &mut Context,
        voter_name: &AccountKey,
        delegator: &AccountKey,
    ) -> Result<Coin, LinoError> {
        let delegation = self.storage.get_delegation(ctx, voter_name, delegator)?;
        self.delegator_withdraw(ctx, voter_name, delegator, delegation.amount)?;
        Ok(delegation.amount)
    }

    /// `deposit + delegated_power`.
    pub fn get_voting_power(&self, ctx: &Context, user: &AccountKey) -> Result<Coin, LinoError> {
        let voter = self.storage.get_voter(ctx, user)?;
        voter.deposit.plus(voter.delegated_power)
    }

    /// On-call validators that did not vote on `proposal`. Empty unless the
    /// proposal type requires validator participation.
    pub fn get_penalty_list(
        &self,
        ctx: &Context,
        proposal: &ProposalKey,
        proposal_type: ProposalType,
        oncall_validators: &[AccountKey],
    ) -> Result<PenaltyList, LinoError> {
        if !proposal_type.requires_validator_participation() {
            return Ok(PenaltyList::default());
        }
        let voted: BTreeSet<AccountKey> = self
            .storage
            .get_all_votes(ctx, proposal)?
            .into_iter()
            .map(|vote| vote.voter)
            .collect();
        Ok(PenaltyList {
            penalty_list: oncall_validators
                .iter()
                .filter(|validator| !voted.contains(*validator))
                .cloned()
                .collect(),
        })
    }

    pub fn get_voter_deposit(&self, ctx: &Context, user: &AccountKey) -> Result<Coin, LinoError> {
        Ok(self.storage.get_voter(ctx, user)?.deposit)
    }

    pub fn get_all_delegators(&self, ctx: &Context, voter: &AccountKey) -> Result<Vec<AccountKey>, LinoError> {
        Ok(self
            .storage
            .get_all_delegations(ctx, voter)?
            .into_iter()
            .map(|d| d.delegator)
            .collect())
    }

    pub fn get_validator_reference_list(&self, ctx: &Context) -> Result<ReferenceList, LinoError> {
        self.storage.get_reference_list(ctx)
    }

    pub fn set_validator_reference_list(&self, ctx: &mut Context, list: &ReferenceList) -> Result<(), LinoError> {
        self.storage.set_reference_list(ctx, list)
    }
}

impl StakeLedger for VoteManager {
    fn get_voting_power(&self, ctx: &Context, key: &AccountKey) -> Result<Coin, LinoError> {
        match VoteManager::get_voting_power(self, ctx, key) {
            Err(LinoError::VoterNotFound(_)) => Ok(Coin::zero()),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lino_core::{BlockInfo, Params};
    use lino_store::MemoryStore;

    fn test_params() -> Params {
        let mut params = Params::default();
        params.vote.voter_min_deposit = Coin::new(1_000);
        params.vote.voter_min_withdraw = Coin::new(10);
        params.vote.delegator_min_withdraw = Coin::new(5);
        params.validator.validator_min_voting_deposit = Coin::new(5_000);
        params
    }

    fn key(name: &str) -> AccountKey {
        AccountKey::new(name)
    }

    #[test]
    fn test_add_voter_below_minimum() {
        let store = MemoryStore::new();
        let params = test_params();
        let mut ctx = Context::new(&store, &params, BlockInfo::default());
        let vm = VoteManager::new();
        let err = vm.add_voter(&mut ctx, &key("alice"), Coin::new(999)).unwrap_err();
        assert!(matches!(err, LinoError::InsufficientDeposit(_)));
        assert!(!vm.does_voter_exist(&ctx, &key("alice")).unwrap());
    }

    #[test]
    fn test_deposit_withdraw_all_round_trip() {
        let store = MemoryStore::new();
        let params = test_params();
        let mut ctx = Context::new(&store, &params, BlockInfo::default());
        let vm = VoteManager::new();
        vm.add_voter(&mut ctx, &key("alice"), Coin::new(1_234)).unwrap();
        assert_eq!(vm.voter_withdraw_all(&mut ctx, &key("alice")).unwrap(), Coin::new(1_234));
        assert!(!vm.does_voter_exist(&ctx, &key("alice")).unwrap());
    }

    #[test]
    fn test_deposit_increases_voting_power() {
        let store = MemoryStore::new();
        let params = test_params();
        let mut ctx = Context::new(&store, &params, BlockInfo::default());
        let vm = VoteManager::new();
        vm.add_voter(&mut ctx, &key("alice"), Coin::new(1_000)).unwrap();
        vm.deposit(&mut ctx, &key("alice"), Coin::new(500)).unwrap();
        assert_eq!(vm.get_voter_deposit(&ctx, &key("alice")).unwrap(), Coin::new(1_500));
        assert_eq!(vm.get_voting_power(&ctx, &key("alice")).unwrap(), Coin::new(1_500));
        assert!(matches!(
            vm.deposit(&mut ctx, &key("bob"), Coin::new(1)),
            Err(LinoError::VoterNotFound(_))
        ));
    }

    #[test]
    fn test_stake_weight_is_voting_power() {
        let store = MemoryStore::new();
        let params = test_params();
        let mut ctx = Context::new(&store, &params, BlockInfo::default());
        let vm = VoteManager::new();
        let stakes: &dyn StakeLedger = &vm;
        assert_eq!(stakes.get_voting_power(&ctx, &key("alice")).unwrap(), Coin::zero());

        vm.add_voter(&mut ctx, &key("alice"), Coin::new(1_000)).unwrap();
        vm.add_delegation(&mut ctx, &key("alice"), &key("bob"), Coin::new(250)).unwrap();
        assert_eq!(stakes.get_voting_power(&ctx, &key("alice")).unwrap(), Coin::new(1_250));
        // Delegating does not give the delegator any weight of its own.
        assert_eq!(stakes.get_voting_power(&ctx, &key("bob")).unwrap(), Coin::zero());
    }

    #[test]
    fn test_voter_withdraw_all_blocked_by_delegations() {
        let store = MemoryStore::new();
        let params = test_params();
        let mut ctx = Context::new(&store, &params, BlockInfo::default());
        let vm = VoteManager::new();
        vm.add_voter(&mut ctx, &key("alice"), Coin::new(1_000)).unwrap();
        vm.add_delegation(&mut ctx, &key("alice"), &key("bob"), Coin::new(10)).unwrap();
        assert!(matches!(
            vm.voter_withdraw_all(&mut ctx, &key("alice")),
            Err(LinoError::IllegalWithdraw(_))
        ));
    }

    #[test]
    fn test_voter_withdraw_zero_is_invalid() {
        let store = MemoryStore::new();
        let params = test_params();
        let mut ctx = Context::new(&store, &params, BlockInfo::default());
        let vm = VoteManager::new();
        vm.add_voter(&mut ctx, &key("alice"), Coin::new(1_000)).unwrap();
        assert!(matches!(
            vm.voter_withdraw(&mut ctx, &key("alice"), Coin::zero()),
            Err(LinoError::InvalidCoin(_))
        ));
    }

    #[test]
    fn test_is_legal_voter_withdraw() {
        let store = MemoryStore::new();
        let params = test_params();
        let mut ctx = Context::new(&store, &params, BlockInfo::default());
        let vm = VoteManager::new();
        vm.add_voter(&mut ctx, &key("alice"), Coin::new(1_100)).unwrap();

        // Below the minimum withdraw.
        assert!(!vm.is_legal_voter_withdraw(&ctx, &key("alice"), Coin::new(9)).unwrap());
        // Leaves exactly the minimum deposit.
        assert!(vm.is_legal_voter_withdraw(&ctx, &key("alice"), Coin::new(100)).unwrap());
        // Would drop below the minimum deposit.
        assert!(!vm.is_legal_voter_withdraw(&ctx, &key("alice"), Coin::new(101)).unwrap());
        // More than the deposit.
        assert!(!vm.is_legal_voter_withdraw(&ctx, &key("alice"), Coin::new(5_000)).unwrap());
        // Unknown voter.
        assert!(!vm.is_legal_voter_withdraw(&ctx, &key("bob"), Coin::new(100)).unwrap());
    }

    #[test]
    fn test_validator_cannot_withdraw() {
        let store = MemoryStore::new();
        let params = test_params();
        let mut ctx = Context::new(&store, &params, BlockInfo::default());
        let vm = VoteManager::new();
        vm.add_voter(&mut ctx, &key("alice"), Coin::new(2_000)).unwrap();
        vm.set_validator_reference_list(
            &mut ctx,
            &ReferenceList {
                all_validators: vec![key("alice")],
                oncall_validators: vec![key("alice")],
            },
        )
        .unwrap();
        assert!(vm.is_in_validator_list(&ctx, &key("alice")).unwrap());
        assert!(!vm.is_legal_voter_withdraw(&ctx, &key("alice"), Coin::new(100)).unwrap());
    }

    #[test]
    fn test_delegation_conservation() {
        let store = MemoryStore::new();
        let params = test_params();
        let mut ctx = Context::new(&store, &params, BlockInfo::default());
        let vm = VoteManager::new();
        let voter = key("alice");
        vm.add_voter(&mut ctx, &voter, Coin::new(1_000)).unwrap();

        let steps: &[(&str, bool, u64)] = &[
            ("bob", true, 100),
            ("carol", true, 50),
            ("bob", true, 25),
            ("bob", false, 60),
            ("carol", false, 50),
            ("dave", true, 7),
            ("bob", false, 65),
        ];
        for (delegator, add, amount) in steps {
            let delegator = key(delegator);
            if *add {
                vm.add_delegation(&mut ctx, &voter, &delegator, Coin::new(*amount)).unwrap();
            } else {
                vm.delegator_withdraw(&mut ctx, &voter, &delegator, Coin::new(*amount)).unwrap();
            }
            let live: u64 = vm
                .get_all_delegators(&ctx, &voter)
                .unwrap()
                .iter()
                .map(|d| vm.get_delegation(&ctx, &voter, d).unwrap().amount.amount)
                .sum();
            assert_eq!(vm.get_voter(&ctx, &voter).unwrap().delegated_power.amount, live);
        }
        // bob and carol withdrew everything, so only dave remains.
        assert_eq!(vm.get_all_delegators(&ctx, &voter).unwrap(), vec![key("dave")]);
        assert_eq!(vm.get_voting_power(&ctx, &voter).unwrap(), Coin::new(1_007));
    }

    #[test]
    fn test_delegation_to_unknown_voter_writes_nothing() {
        let store = MemoryStore::new();
        let params = test_params();
        let mut ctx = Context::new(&store, &params, BlockInfo::default());
        let vm = VoteManager::new();
        let err = vm
            .add_delegation(&mut ctx, &key("alice"), &key("bob"), Coin::new(10))
            .unwrap_err();
        assert!(matches!(err, LinoError::VoterNotFound(_)));
        assert_eq!(ctx.store.pending_len(), 0);
    }

    #[test]
    fn test_is_legal_delegator_withdraw() {
        let store = MemoryStore::new();
        let params = test_params();
        let mut ctx = Context::new(&store, &params, BlockInfo::default());
        let vm = VoteManager::new();
        vm.add_voter(&mut ctx, &key("alice"), Coin::new(1_000)).unwrap();
        vm.add_delegation(&mut ctx, &key("alice"), &key("bob"), Coin::new(20)).unwrap();

        assert!(vm.is_legal_delegator_withdraw(&ctx, &key("alice"), &key("bob"), Coin::new(20)).unwrap());
        assert!(!vm.is_legal_delegator_withdraw(&ctx, &key("alice"), &key("bob"), Coin::new(21)).unwrap());
        assert!(!vm.is_legal_delegator_withdraw(&ctx, &key("alice"), &key("bob"), Coin::new(4)).unwrap());
        assert!(!vm.is_legal_delegator_withdraw(&ctx, &key("alice"), &key("carol"), Coin::new(5)).unwrap());
    }

    #[test]
    fn test_delegator_withdraw_all() {
        let store = MemoryStore::new();
        let params = test_params();
        let mut ctx = Context::new(&store, &params, BlockInfo::default());
        let vm = VoteManager::new();
        vm.add_voter(&mut ctx, &key("alice"), Coin::new(1_000)).unwrap();
        vm.add_delegation(&mut ctx, &key("alice"), &key("bob"), Coin::new(20)).unwrap();

        assert_eq!(
            vm.delegator_withdraw_all(&mut ctx, &key("alice"), &key("bob")).unwrap(),
            Coin::new(20)
        );
        assert!(!vm.does_delegation_exist(&ctx, &key("alice"), &key("bob")).unwrap());
        assert_eq!(vm.get_voter(&ctx, &key("alice")).unwrap().delegated_power, Coin::zero());
    }

    #[test]
    fn test_voter_with_delegations_cannot_be_emptied() {
        let store = MemoryStore::new();
        let params = test_params();
        let mut ctx = Context::new(&store, &params, BlockInfo::default());
        let vm = VoteManager::new();
        vm.add_voter(&mut ctx, &key("alice"), Coin::new(1_000)).unwrap();
        vm.add_delegation(&mut ctx, &key("alice"), &key("bob"), Coin::new(20)).unwrap();
        assert!(matches!(
            vm.voter_withdraw_all(&mut ctx, &key("alice")),
            Err(LinoError::IllegalWithdraw(_))
        ));
    }

    #[test]
    fn test_can_become_validator_uses_deposit_only() {
        let store = MemoryStore::new();
        let params = test_params();
        let mut ctx = Context::new(&store, &params, BlockInfo::default());
        let vm = VoteManager::new();
        vm.add_voter(&mut ctx, &key("alice"), Coin::new(1_000)).unwrap();
        vm.add_delegation(&mut ctx, &key("alice"), &key("bob"), Coin::new(10_000)).unwrap();
        assert!(!vm.can_become_validator(&ctx, &key("alice")).unwrap());
        vm.deposit(&mut ctx, &key("alice"), Coin::new(4_000)).unwrap();
        assert!(vm.can_become_validator(&ctx, &key("alice")).unwrap());
        assert!(!vm.can_become_validator(&ctx, &key("nobody")).unwrap());
    }

    #[test]
    fn test_vote_is_write_once_and_snapshots_power() {
        let store = MemoryStore::new();
        let params = test_params();
        let mut ctx = Context::new(&store, &params, BlockInfo::default());
        let vm = VoteManager::new();
        let proposal = ProposalKey::from("1");
        vm.add_voter(&mut ctx, &key("alice"), Coin::new(1_000)).unwrap();
        vm.add_vote(&mut ctx, &proposal, &key("alice"), true).unwrap();

        vm.deposit(&mut ctx, &key("alice"), Coin::new(9_000)).unwrap();
        let err = vm.add_vote(&mut ctx, &proposal, &key("alice"), false).unwrap_err();
        assert!(matches!(err, LinoError::VoteAlreadyExists(_)));

        let vote = vm.get_vote(&ctx, &proposal, &key("alice")).unwrap();
        assert!(vote.result);
        assert_eq!(vote.voting_power, Coin::new(1_000));
    }

    #[test]
    fn test_penalty_list() {
        let store = MemoryStore::new();
        let params = test_params();
        let mut ctx = Context::new(&store, &params, BlockInfo::default());
        let vm = VoteManager::new();
        let proposal = ProposalKey::from("7");
        let oncall = vec![key("val-a"), key("val-b"), key("val-c")];
        vm.add_voter(&mut ctx, &key("val-a"), Coin::new(1_000)).unwrap();
        vm.add_vote(&mut ctx, &proposal, &key("val-a"), false).unwrap();

        let list = vm
            .get_penalty_list(&ctx, &proposal, ProposalType::ChangeParam, &oncall)
            .unwrap();
        assert_eq!(list.penalty_list, vec![key("val-b"), key("val-c")]);

        let list = vm
            .get_penalty_list(&ctx, &proposal, ProposalType::ProtocolUpgrade, &oncall)
            .unwrap();
        assert_eq!(list.penalty_list.len(), 2);

        let list = vm
            .get_penalty_list(&ctx, &proposal, ProposalType::ContentCensorship, &oncall)
            .unwrap();
        assert!(list.penalty_list.is_empty());
    }
}
