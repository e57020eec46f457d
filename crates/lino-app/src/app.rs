// crates/lino-app/src/app.rs
//
// The application: a deterministic state machine over a `KvStore`.
//
// Every message runs against a fresh `Context` whose writes are staged in
// memory. The batch is committed only when the handler returns `Ok`; on any
// error the context is dropped and the store is untouched.

use lino_core::{
    AccountKey, AccountLedger, BlockInfo, Coin, Context, KvStore, LinoError, Params, PenaltyList, Permlink,
    ProposalKey, ProposalType,
};
use lino_global::GlobalMeta;
use lino_post::PostMeta;
use lino_vote::{ReferenceList, Vote, Voter};

use crate::genesis::Genesis;
use crate::handler::{dispatch, Managers};
use crate::msg::{parse_positive_coin, Msg};

/// Outcome of delivering one message. `code == 0` means committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxResult {
    pub code: u32,
    pub log: String,
}

impl TxResult {
    pub fn ok() -> Self {
        Self {
            code: 0,
            log: String::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}

impl From<&LinoError> for TxResult {
    fn from(err: &LinoError) -> Self {
        Self {
            code: err.code(),
            log: err.to_string(),
        }
    }
}

/// Last committed block header.
const LAST_BLOCK_KEY: &[u8] = b"app:last_block";

pub struct LinoApp<S: KvStore> {
    store: S,
    params: Params,
    managers: Managers,
    last_block: BlockInfo,
}

impl<S: KvStore> LinoApp<S> {
    pub fn new(store: S, params: Params) -> Self {
        Self {
            store,
            params,
            managers: Managers::new(),
            last_block: BlockInfo::default(),
        }
    }

    /// Reopen an app over an existing store, resuming after its last
    /// committed block.
    pub fn open(store: S, params: Params) -> Result<Self, LinoError> {
        let last_block = match store.get(LAST_BLOCK_KEY)? {
            Some(raw) => serde_json::from_slice(&raw)?,
            None => BlockInfo::default(),
        };
        Ok(Self {
            store,
            params,
            managers: Managers::new(),
            last_block,
        })
    }

    /// Whether genesis has been committed to the store.
    pub fn has_genesis(&self) -> Result<bool, LinoError> {
        Ok(self.store.get(LAST_BLOCK_KEY)?.is_some())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn last_block(&self) -> BlockInfo {
        self.last_block
    }

    /// Run `f` in a fresh message context and commit its writes if it succeeds.
    fn apply<T>(
        &mut self,
        block: BlockInfo,
        f: impl FnOnce(&mut Context, &Managers) -> Result<T, LinoError>,
    ) -> Result<T, LinoError> {
        let mut ctx = Context::new(&self.store, &self.params, block);
        let value = f(&mut ctx, &self.managers)?;
        let batch = ctx.into_batch();
        let writes = batch.len();
        self.store.write_batch(batch)?;
        tracing::debug!("Committed {} writes at height {}", writes, block.height);
        Ok(value)
    }

    /// Run a read-only query against committed state.
    fn query<T>(&self, f: impl FnOnce(&Context, &Managers) -> Result<T, LinoError>) -> Result<T, LinoError> {
        let ctx = Context::new(&self.store, &self.params, self.last_block);
        f(&ctx, &self.managers)
    }

    /// Load genesis state in a single batch.
    pub fn init_genesis(&mut self, genesis: &Genesis) -> Result<(), LinoError> {
        let block = BlockInfo {
            height: 0,
            time: genesis.genesis_time.timestamp(),
        };
        self.apply(block, |ctx, m| {
            for account in &genesis.accounts {
                let balance = Coin::parse_lno(&account.balance)?;
                m.accounts.create_account(ctx, &account.username, balance)?;
            }
            let mut validators = Vec::new();
            for voter in &genesis.voters {
                let deposit = parse_positive_coin(&voter.deposit)?;
                m.accounts.minus_balance(ctx, &voter.username, deposit)?;
                m.votes.add_voter(ctx, &voter.username, deposit)?;
                if voter.validator {
                    if !m.votes.can_become_validator(ctx, &voter.username)? {
                        return Err(LinoError::InsufficientDeposit(format!(
                            "genesis validator {} deposit {} is below the validator minimum",
                            voter.username, deposit
                        )));
                    }
                    validators.push(voter.username.clone());
                }
            }
            for developer in &genesis.developers {
                let deposit = parse_positive_coin(&developer.deposit)?;
                m.developers.register_developer(ctx, &developer.username, deposit)?;
            }
            let list = ReferenceList {
                all_validators: validators.clone(),
                oncall_validators: validators,
            };
            m.votes.set_validator_reference_list(ctx, &list)?;
            ctx.store.set_json(LAST_BLOCK_KEY.to_vec(), &block)
        })?;
        self.last_block = block;
        tracing::info!(
            "Loaded genesis: {} accounts, {} voters, {} developers",
            genesis.accounts.len(),
            genesis.voters.len(),
            genesis.developers.len()
        );
        Ok(())
    }

    /// Start a block. When the block carries an on-call validator set it
    /// replaces the stored one; every member must be a registered validator.
    pub fn begin_block(&mut self, block: BlockInfo, oncall: Option<&[AccountKey]>) -> Result<(), LinoError> {
        if let Some(oncall) = oncall {
            self.apply(block, |ctx, m| {
                let mut list = m.votes.get_validator_reference_list(ctx)?;
                if let Some(stranger) = oncall.iter().find(|v| !list.all_validators.contains(*v)) {
                    return Err(LinoError::InvalidMessage(format!("{} is not a validator", stranger)));
                }
                list.oncall_validators = oncall.to_vec();
                m.votes.set_validator_reference_list(ctx, &list)
            })?;
        }
        self.last_block = block;
        Ok(())
    }

    /// Finish a block, recording it as the resume point.
    pub fn end_block(&mut self, block: BlockInfo) -> Result<(), LinoError> {
        self.apply(block, |ctx, _| ctx.store.set_json(LAST_BLOCK_KEY.to_vec(), &block))?;
        self.last_block = block;
        Ok(())
    }

    /// Validate, execute, and commit one message. A rejected message leaves
    /// the store exactly as it was.
    pub fn deliver(&mut self, block: BlockInfo, msg: &Msg) -> TxResult {
        let result = msg
            .validate_basic()
            .and_then(|()| self.apply(block, |ctx, m| dispatch(ctx, m, msg)));
        match result {
            Ok(()) => {
                tracing::info!("Committed {} at height {}", msg.kind(), block.height);
                TxResult::ok()
            }
            Err(e) => {
                tracing::warn!(
                    "Rejected {} at height {} (code {}): {}",
                    msg.kind(),
                    block.height,
                    e.code(),
                    e
                );
                TxResult::from(&e)
            }
        }
    }

    /// SHA-256 over committed state.
    pub fn state_hash(&self) -> Result<String, LinoError> {
        lino_store::state_hash(&self.store)
    }

    /// On-call validators that skipped `proposal`, per the stored on-call set.
    pub fn penalty_list(&self, proposal: &ProposalKey, proposal_type: ProposalType) -> Result<PenaltyList, LinoError> {
        self.query(|ctx, m| {
            let list = m.votes.get_validator_reference_list(ctx)?;
            m.votes
                .get_penalty_list(ctx, proposal, proposal_type, &list.oncall_validators)
        })
    }

    pub fn balance(&self, user: &AccountKey) -> Result<Coin, LinoError> {
        self.query(|ctx, m| m.accounts.get_saving(ctx, user))
    }

    pub fn voter(&self, user: &AccountKey) -> Result<Voter, LinoError> {
        self.query(|ctx, m| m.votes.get_voter(ctx, user))
    }

    pub fn voting_power(&self, user: &AccountKey) -> Result<Coin, LinoError> {
        self.query(|ctx, m| m.votes.get_voting_power(ctx, user))
    }

    pub fn delegators(&self, voter: &AccountKey) -> Result<Vec<AccountKey>, LinoError> {
        self.query(|ctx, m| m.votes.get_all_delegators(ctx, voter))
    }

    pub fn vote(&self, proposal: &ProposalKey, voter: &AccountKey) -> Result<Vote, LinoError> {
        self.query(|ctx, m| m.votes.get_vote(ctx, proposal, voter))
    }

    pub fn reference_list(&self) -> Result<ReferenceList, LinoError> {
        self.query(|ctx, m| m.votes.get_validator_reference_list(ctx))
    }

    pub fn post_meta(&self, permlink: &Permlink) -> Result<PostMeta, LinoError> {
        self.query(|ctx, m| m.posts.get_meta(ctx, permlink))
    }

    pub fn global_meta(&self) -> Result<GlobalMeta, LinoError> {
        self.query(|ctx, m| m.global.get_meta(ctx))
    }

    pub fn account_exists(&self, user: &AccountKey) -> Result<bool, LinoError> {
        self.query(|ctx, m| m.accounts.does_account_exist(ctx, user))
    }
}
