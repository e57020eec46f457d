// crates/lino-post/src/ops.rs
//
// Post operations as seen by a message handler: every precondition that
// involves the account ledger or protocol parameters is checked here, then
// the change is staged through the post ledger.

use lino_core::{AccountKey, AccountLedger, Context, LinoError, Permlink, PostLedger, Rational, StakeLedger};

use crate::manager::{NewPost, PostManager};
use crate::model::{PostInfo, PostLink};

/// Unparsed create-post request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePost {
    pub author: AccountKey,
    pub post_id: String,
    pub title: String,
    pub content: String,
    pub parent: Option<Permlink>,
    pub source: Option<Permlink>,
    pub links: Vec<PostLink>,
    /// Decimal string, e.g. `"0.5"`.
    pub redistribution_split_rate: String,
}

fn ensure_account(accounts: &dyn AccountLedger, ctx: &Context, user: &AccountKey) -> Result<(), LinoError> {
    if !accounts.does_account_exist(ctx, user)? {
        return Err(LinoError::AccountNotFound(user.to_string()));
    }
    Ok(())
}

fn ensure_post(posts: &PostManager, ctx: &Context, permlink: &Permlink) -> Result<(), LinoError> {
    if !posts.does_post_exist(ctx, permlink)? {
        return Err(LinoError::PostNotFound(permlink.to_string()));
    }
    Ok(())
}

fn ensure_live_post(posts: &PostManager, ctx: &Context, permlink: &Permlink) -> Result<(), LinoError> {
    ensure_post(posts, ctx, permlink)?;
    if posts.is_deleted(ctx, permlink)? {
        return Err(LinoError::PostDeleted(permlink.to_string()));
    }
    Ok(())
}

/// Create a post, linking it under its parent when one is given.
///
/// # Errors
/// `AccountNotFound`, `PostAlreadyExists`, `RateLimited` when the author
/// posted less than `post_interval_sec` ago, `PostNotFound`/`PostDeleted`
/// for a missing parent or source, `InvalidSplitRate`.
pub fn create_post(
    ctx: &mut Context,
    posts: &PostManager,
    accounts: &dyn AccountLedger,
    msg: &CreatePost,
) -> Result<(), LinoError> {
    ensure_account(accounts, ctx, &msg.author)?;
    let permlink = Permlink::new(msg.author.clone(), msg.post_id.clone());
    if posts.does_post_exist(ctx, &permlink)? {
        return Err(LinoError::PostAlreadyExists(permlink.to_string()));
    }
    let last_post_at = accounts.get_last_post_at(ctx, &msg.author)?;
    if last_post_at.saturating_add(ctx.params.post.post_interval_sec) > ctx.block_time() {
        return Err(LinoError::RateLimited(format!("{} posts too often", msg.author)));
    }
    if let Some(parent) = &msg.parent {
        ensure_live_post(posts, ctx, parent)?;
    }
    if let Some(source) = &msg.source {
        ensure_post(posts, ctx, source)?;
    }
    let split_rate = Rational::from_decimal(&msg.redistribution_split_rate)
        .map_err(|_| LinoError::InvalidSplitRate(msg.redistribution_split_rate.clone()))?;

    let post = NewPost {
        info: PostInfo {
            author: msg.author.clone(),
            post_id: msg.post_id.clone(),
            title: msg.title.clone(),
            content: msg.content.clone(),
            parent: msg.parent.clone(),
            source: msg.source.clone(),
            links: msg.links.clone(),
        },
        redistribution_split_rate: split_rate,
    };
    posts.create_post(ctx, &post)?;
    if let Some(parent) = &msg.parent {
        posts.add_comment(ctx, parent, &permlink)?;
    }
    accounts.update_last_post_at(ctx, &msg.author)
}

/// Record `user`'s current voting power as a report or upvote on a live post.
pub fn report_or_upvote(
    ctx: &mut Context,
    posts: &PostManager,
    accounts: &dyn AccountLedger,
    stakes: &dyn StakeLedger,
    user: &AccountKey,
    permlink: &Permlink,
    is_report: bool,
) -> Result<(), LinoError> {
    ensure_account(accounts, ctx, user)?;
    ensure_live_post(posts, ctx, permlink)?;
    let last = accounts.get_last_report_or_upvote_at(ctx, user)?;
    if last.saturating_add(ctx.params.post.report_or_upvote_interval_sec) > ctx.block_time() {
        return Err(LinoError::RateLimited(format!("{} reports or upvotes too often", user)));
    }
    let stake = stakes.get_voting_power(ctx, user)?;
    posts.report_or_upvote(ctx, permlink, user, stake, is_report)?;
    accounts.update_last_report_or_upvote_at(ctx, user)
}

pub fn update_post(
    ctx: &mut Context,
    posts: &PostManager,
    accounts: &dyn AccountLedger,
    permlink: &Permlink,
    title: &str,
    content: &str,
    links: &[PostLink],
) -> Result<(), LinoError> {
    ensure_account(accounts, ctx, &permlink.author)?;
    ensure_live_post(posts, ctx, permlink)?;
    posts.update_post(ctx, permlink, title, content, links)?;
    accounts.update_last_activity(ctx, &permlink.author)
}

pub fn delete_post(
    ctx: &mut Context,
    posts: &PostManager,
    accounts: &dyn AccountLedger,
    permlink: &Permlink,
) -> Result<(), LinoError> {
    ensure_account(accounts, ctx, &permlink.author)?;
    ensure_live_post(posts, ctx, permlink)?;
    posts.delete_post(ctx, permlink)?;
    accounts.update_last_activity(ctx, &permlink.author)
}

pub fn view(
    ctx: &mut Context,
    posts: &PostManager,
    accounts: &dyn AccountLedger,
    user: &AccountKey,
    permlink: &Permlink,
) -> Result<(), LinoError> {
    ensure_account(accounts, ctx, user)?;
    ensure_live_post(posts, ctx, permlink)?;
    posts.add_or_update_view(ctx, permlink, user)
}
