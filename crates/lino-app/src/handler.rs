// crates/lino-app/src/handler.rs
//
// Per-message handlers. `dispatch` matches every `Msg` variant exhaustively;
// each handler validates its preconditions against the ledgers and stages
// its writes in the message context. Nothing here commits.

use lino_account::{AccountManager, DeveloperManager};
use lino_core::{AccountKey, AccountLedger, Coin, Context, LinoError, Permlink};
use lino_global::GlobalManager;
use lino_post::{ops, Donation, PostManager};
use lino_vote::VoteManager;

use crate::msg::{parse_positive_coin, Msg};

/// The ledgers every handler works against.
#[derive(Debug, Clone, Copy)]
pub struct Managers {
    pub accounts: AccountManager,
    pub developers: DeveloperManager,
    pub global: GlobalManager,
    pub votes: VoteManager,
    pub posts: PostManager,
}

impl Managers {
    pub fn new() -> Self {
        let accounts = AccountManager::new();
        Self {
            accounts,
            developers: DeveloperManager::new(accounts),
            global: GlobalManager::new(),
            votes: VoteManager::new(),
            posts: PostManager::new(),
        }
    }

    fn ensure_account(&self, ctx: &Context, user: &AccountKey) -> Result<(), LinoError> {
        if !self.accounts.does_account_exist(ctx, user)? {
            return Err(LinoError::AccountNotFound(user.to_string()));
        }
        Ok(())
    }
}

impl Default for Managers {
    fn default() -> Self {
        Self::new()
    }
}

pub fn dispatch(ctx: &mut Context, m: &Managers, msg: &Msg) -> Result<(), LinoError> {
    match msg {
        Msg::VoterDeposit { username, deposit } => voter_deposit(ctx, m, username, parse_positive_coin(deposit)?),
        Msg::VoterWithdraw { username, amount } => voter_withdraw(ctx, m, username, parse_positive_coin(amount)?),
        Msg::VoterRevoke { username } => voter_revoke(ctx, m, username),
        Msg::Delegate { delegator, voter, amount } => {
            delegate(ctx, m, voter, delegator, parse_positive_coin(amount)?)
        }
        Msg::DelegatorWithdraw { delegator, voter, amount } => {
            delegator_withdraw(ctx, m, voter, delegator, parse_positive_coin(amount)?)
        }
        Msg::RevokeDelegation { delegator, voter } => revoke_delegation(ctx, m, voter, delegator),
        Msg::Vote { voter, proposal_id, result } => {
            m.ensure_account(ctx, voter)?;
            m.votes.add_vote(ctx, proposal_id, voter, *result)
        }
        Msg::CreatePost {
            author,
            post_id,
            title,
            content,
            parent,
            source,
            links,
            redistribution_split_rate,
        } => {
            let request = ops::CreatePost {
                author: author.clone(),
                post_id: post_id.clone(),
                title: title.clone(),
                content: content.clone(),
                parent: parent.clone(),
                source: source.clone(),
                links: links.clone(),
                redistribution_split_rate: redistribution_split_rate.clone(),
            };
            ops::create_post(ctx, &m.posts, &m.accounts, &request)
        }
        Msg::UpdatePost { author, post_id, title, content, links } => {
            let permlink = Permlink::new(author.clone(), post_id.clone());
            ops::update_post(ctx, &m.posts, &m.accounts, &permlink, title, content, links)
        }
        Msg::DeletePost { author, post_id } => {
            let permlink = Permlink::new(author.clone(), post_id.clone());
            ops::delete_post(ctx, &m.posts, &m.accounts, &permlink)
        }
        Msg::View { username, author, post_id } => {
            let permlink = Permlink::new(author.clone(), post_id.clone());
            ops::view(ctx, &m.posts, &m.accounts, username, &permlink)
        }
        Msg::ReportOrUpvote { username, author, post_id, is_report } => {
            let permlink = Permlink::new(author.clone(), post_id.clone());
            ops::report_or_upvote(ctx, &m.posts, &m.accounts, &m.votes, username, &permlink, *is_report)
        }
        Msg::Donate { username, author, post_id, amount, from_app, .. } => {
            let donation = Donation {
                consumer: username.clone(),
                permlink: Permlink::new(author.clone(), post_id.clone()),
                amount: parse_positive_coin(amount)?,
                from_app: from_app.clone(),
            };
            lino_post::donate(ctx, &m.accounts, &m.posts, &m.global, &m.developers, &m.votes, &donation).map(|_| ())
        }
        Msg::DeveloperRegister { username, deposit } => {
            m.developers
                .register_developer(ctx, username, parse_positive_coin(deposit)?)
        }
    }
}

fn voter_deposit(ctx: &mut Context, m: &Managers, user: &AccountKey, coin: Coin) -> Result<(), LinoError> {
    m.ensure_account(ctx, user)?;
    m.accounts.minus_balance(ctx, user, coin)?;
    if m.votes.does_voter_exist(ctx, user)? {
        m.votes.deposit(ctx, user, coin)
    } else {
        m.votes.add_voter(ctx, user, coin)
    }
}

fn voter_withdraw(ctx: &mut Context, m: &Managers, user: &AccountKey, coin: Coin) -> Result<(), LinoError> {
    m.ensure_account(ctx, user)?;
    if !m.votes.is_legal_voter_withdraw(ctx, user, coin)? {
        return Err(LinoError::IllegalWithdraw(format!("{} cannot withdraw {}", user, coin)));
    }
    m.votes.voter_withdraw(ctx, user, coin)?;
    m.accounts.add_balance(ctx, user, coin)
}

fn voter_revoke(ctx: &mut Context, m: &Managers, user: &AccountKey) -> Result<(), LinoError> {
    m.ensure_account(ctx, user)?;
    if !m.votes.does_voter_exist(ctx, user)? {
        return Err(LinoError::VoterNotFound(user.to_string()));
    }
    if m.votes.is_in_validator_list(ctx, user)? {
        return Err(LinoError::IllegalWithdraw(format!("validator {} cannot revoke", user)));
    }
    for delegator in m.votes.get_all_delegators(ctx, user)? {
        let returned = m.votes.delegator_withdraw_all(ctx, user, &delegator)?;
        m.accounts.add_balance(ctx, &delegator, returned)?;
    }
    let withdrawn = m.votes.voter_withdraw_all(ctx, user)?;
    m.accounts.add_balance(ctx, user, withdrawn)
}

fn delegate(
    ctx: &mut Context,
    m: &Managers,
    voter: &AccountKey,
    delegator: &AccountKey,
    coin: Coin,
) -> Result<(), LinoError> {
    m.ensure_account(ctx, delegator)?;
    if !m.votes.does_voter_exist(ctx, voter)? {
        return Err(LinoError::VoterNotFound(voter.to_string()));
    }
    m.accounts.minus_balance(ctx, delegator, coin)?;
    m.votes.add_delegation(ctx, voter, delegator, coin)
}

fn delegator_withdraw(
    ctx: &mut Context,
    m: &Managers,
    voter: &AccountKey,
    delegator: &AccountKey,
    coin: Coin,
) -> Result<(), LinoError> {
    m.ensure_account(ctx, delegator)?;
    if !m.votes.is_legal_delegator_withdraw(ctx, voter, delegator, coin)? {
        return Err(LinoError::IllegalWithdraw(format!(
            "{} cannot withdraw {} delegated to {}",
            delegator, coin, voter
        )));
    }
    m.votes.delegator_withdraw(ctx, voter, delegator, coin)?;
    m.accounts.add_balance(ctx, delegator, coin)
}

fn revoke_delegation(ctx: &mut Context, m: &Managers, voter: &AccountKey, delegator: &AccountKey) -> Result<(), LinoError> {
    m.ensure_account(ctx, delegator)?;
    let returned = m.votes.delegator_withdraw_all(ctx, voter, delegator)?;
    m.accounts.add_balance(ctx, delegator, returned)
}
