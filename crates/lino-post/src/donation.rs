// crates/lino-post/src/donation.rs
//
// Donation settlement pipeline.
//
// A donation moves coin from a consumer to a post author. When the target
// post is derived from a source post, `floor(amount * (1 - source split
// rate))` is settled against the source post first and the residual against
// the target. Each leg:
//
//   friction       = floor(leg * consumption_friction_rate)  -> inflation pool
//   direct_deposit = leg - friction                          -> author balance
//
// so `debited == sum(direct_deposit + friction)` over all legs. Every step
// stages its writes in the message context; any failure discards the whole
// donation, including the consumer debit.

use lino_core::{
    AccountKey, AccountLedger, Coin, Context, DeveloperRegistry, DonationKind, GlobalPool, LinoError,
    Permlink, PostLedger, RewardEvent, StakeLedger,
};

/// A consumer's donation to a post, optionally attributed to an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Donation {
    pub consumer: AccountKey,
    pub permlink: Permlink,
    pub amount: Coin,
    pub from_app: Option<AccountKey>,
}

/// Outcome of one settled leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegSettlement {
    pub permlink: Permlink,
    pub original: Coin,
    pub friction: Coin,
    pub direct_deposit: Coin,
    pub evaluate: Coin,
}

/// Outcome of a whole donation. Zero-amount legs are omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub debited: Coin,
    pub legs: Vec<LegSettlement>,
}

impl Settlement {
    /// Sum of `direct_deposit + friction` over all legs.
    pub fn settled(&self) -> Result<Coin, LinoError> {
        self.legs.iter().try_fold(Coin::zero(), |acc, leg| {
            acc.plus(leg.direct_deposit)?.plus(leg.friction)
        })
    }
}

/// Settle `donation`. The consumer's voting power is recorded as an upvote
/// on the target post.
///
/// # Errors
/// `InvalidCoin`, `AccountNotFound`, `PostNotFound`, `PostDeleted`,
/// `SelfDonationForbidden`, `DeveloperNotFound` before anything is staged;
/// `InsufficientBalance` from the debit; any collaborator error from a leg.
pub fn donate(
    ctx: &mut Context,
    accounts: &dyn AccountLedger,
    posts: &dyn PostLedger,
    global: &dyn GlobalPool,
    developers: &dyn DeveloperRegistry,
    stakes: &dyn StakeLedger,
    donation: &Donation,
) -> Result<Settlement, LinoError> {
    let Donation {
        consumer,
        permlink,
        amount,
        from_app,
    } = donation;

    if amount.is_zero() {
        return Err(LinoError::InvalidCoin("donation must be positive".to_string()));
    }
    if !accounts.does_account_exist(ctx, consumer)? {
        return Err(LinoError::AccountNotFound(consumer.to_string()));
    }
    if !posts.does_post_exist(ctx, permlink)? {
        return Err(LinoError::PostNotFound(permlink.to_string()));
    }
    if posts.is_deleted(ctx, permlink)? {
        return Err(LinoError::PostDeleted(permlink.to_string()));
    }
    if *consumer == permlink.author {
        return Err(LinoError::SelfDonationForbidden(consumer.to_string()));
    }
    if let Some(app) = from_app {
        if !app.is_empty() && !developers.does_developer_exist(ctx, app)? {
            return Err(LinoError::DeveloperNotFound(app.to_string()));
        }
    }
    let from_app = from_app.as_ref().filter(|app| !app.is_empty());

    accounts.minus_balance(ctx, consumer, *amount)?;
    let stake = stakes.get_voting_power(ctx, consumer)?;
    posts.report_or_upvote(ctx, permlink, consumer, stake, false)?;

    let mut legs = Vec::with_capacity(2);
    let mut residual = *amount;
    if let Some(source) = posts.get_source_post(ctx, permlink)? {
        let split_rate = posts.get_redistribution_split_rate(ctx, &source)?;
        let source_income = split_rate.one_minus()?.mul_coin(*amount)?;
        residual = residual.minus(source_income)?;
        if let Some(leg) = settle_leg(ctx, accounts, posts, global, consumer, &source, source_income, from_app)? {
            legs.push(leg);
        }
    }
    if let Some(leg) = settle_leg(ctx, accounts, posts, global, consumer, permlink, residual, from_app)? {
        legs.push(leg);
    }

    accounts.update_last_activity(ctx, consumer)?;

    let settlement = Settlement {
        debited: *amount,
        legs,
    };
    if settlement.settled()? != *amount {
        return Err(LinoError::ArithmeticInvariantViolation(format!(
            "donation of {} settled {}",
            amount,
            settlement.settled()?
        )));
    }
    tracing::debug!("{} donated {} to {} in {} legs", consumer, amount, permlink, settlement.legs.len());
    Ok(settlement)
}

#[allow(clippy::too_many_arguments)]
fn settle_leg(
    ctx: &mut Context,
    accounts: &dyn AccountLedger,
    posts: &dyn PostLedger,
    global: &dyn GlobalPool,
    consumer: &AccountKey,
    permlink: &Permlink,
    coin: Coin,
    from_app: Option<&AccountKey>,
) -> Result<Option<LegSettlement>, LinoError> {
    if coin.is_zero() {
        return Ok(None);
    }
    let author = &permlink.author;
    if !accounts.does_account_exist(ctx, author)? {
        return Err(LinoError::AccountNotFound(author.to_string()));
    }

    let friction_rate = global.get_consumption_friction_rate(ctx)?;
    let (friction, direct_deposit) = friction_rate.split_coin(coin)?;

    let relationship = accounts.get_donation_relationship(ctx, consumer, author)?;
    let (created_at, total_reward) = posts.get_created_time_and_total_reward(ctx, permlink)?;
    let evaluate = global.evaluate_consumption(ctx, coin, relationship, created_at, total_reward)?;

    let event = RewardEvent {
        post_author: author.clone(),
        post_id: permlink.post_id.clone(),
        consumer: consumer.clone(),
        evaluate,
        original: coin,
        friction,
        from_app: from_app.cloned(),
    };
    global.add_friction_and_register_reward_event(ctx, event, friction, evaluate)?;

    posts.add_donation(ctx, permlink, consumer, direct_deposit, DonationKind::DirectDeposit)?;
    accounts.add_balance(ctx, author, direct_deposit)?;
    accounts.add_direct_deposit(ctx, author, direct_deposit)?;
    global.add_consumption(ctx, coin)?;
    accounts.increment_donation_relationship(ctx, consumer, author)?;

    tracing::debug!(
        "Settled {} on {}: friction {}, direct deposit {}, evaluate {}",
        coin,
        permlink,
        friction,
        direct_deposit,
        evaluate
    );
    Ok(Some(LegSettlement {
        permlink: permlink.clone(),
        original: coin,
        friction,
        direct_deposit,
        evaluate,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lino_account::{AccountManager, DeveloperManager};
    use lino_core::{BlockInfo, KvStore, Params, Rational};
    use lino_global::GlobalManager;
    use lino_store::MemoryStore;
    use lino_vote::VoteManager;

    use crate::manager::{NewPost, PostManager};
    use crate::model::PostInfo;

    const T0: i64 = 1_000_000;

    struct Ledgers {
        accounts: AccountManager,
        posts: PostManager,
        global: GlobalManager,
        developers: DeveloperManager,
        votes: VoteManager,
    }

    impl Ledgers {
        fn new() -> Self {
            let accounts = AccountManager::new();
            Self {
                accounts,
                posts: PostManager::new(),
                global: GlobalManager::new(),
                developers: DeveloperManager::new(accounts),
                votes: VoteManager::new(),
            }
        }

        fn donate(&self, ctx: &mut Context, donation: &Donation) -> Result<Settlement, LinoError> {
            donate(ctx, &self.accounts, &self.posts, &self.global, &self.developers, &self.votes, donation)
        }
    }

    fn post(author: &str, post_id: &str, source: Option<Permlink>, rate: Rational) -> NewPost {
        NewPost {
            info: PostInfo {
                author: AccountKey::new(author),
                post_id: post_id.to_string(),
                title: String::new(),
                content: String::new(),
                parent: None,
                source,
                links: vec![],
            },
            redistribution_split_rate: rate,
        }
    }

    fn setup(ctx: &mut Context, l: &Ledgers) {
        for (name, balance) in [("alice", 0), ("bob", 1_000_000), ("carol", 0)] {
            l.accounts
                .create_account(ctx, &AccountKey::new(name), Coin::new(balance))
                .unwrap();
        }
        l.posts.create_post(ctx, &post("alice", "orig", None, Rational::zero())).unwrap();
    }

    fn donation(to: Permlink, amount: u64) -> Donation {
        Donation {
            consumer: AccountKey::new("bob"),
            permlink: to,
            amount: Coin::new(amount),
            from_app: None,
        }
    }

    #[test]
    fn test_conservation_on_plain_post() {
        let store = MemoryStore::new();
        let mut params = Params::default();
        params.global.consumption_friction_rate = Rational::new(1, 3).unwrap();
        let l = Ledgers::new();
        let mut ctx = Context::new(&store, &params, BlockInfo { height: 1, time: T0 });
        setup(&mut ctx, &l);

        for amount in [1u64, 2, 3, 7, 100, 99_999] {
            let settlement = l.donate(&mut ctx, &donation(Permlink::new("alice", "orig"), amount)).unwrap();
            assert_eq!(settlement.legs.len(), 1);
            let leg = &settlement.legs[0];
            assert_eq!(leg.friction, Coin::new(amount / 3));
            assert_eq!(leg.direct_deposit.amount + leg.friction.amount, amount);
        }
        let total: u64 = 1 + 2 + 3 + 7 + 100 + 99_999;
        assert_eq!(l.accounts.get_saving(&ctx, &AccountKey::new("bob")).unwrap(), Coin::new(1_000_000 - total));
        let meta = l.global.get_meta(&ctx).unwrap();
        assert_eq!(meta.total_consumption, Coin::new(total));
        let alice = l.accounts.get_saving(&ctx, &AccountKey::new("alice")).unwrap();
        assert_eq!(alice.amount + meta.inflation_pool.amount, total);
    }

    #[test]
    fn test_derivative_split() {
        let store = MemoryStore::new();
        let mut params = Params::default();
        params.global.consumption_friction_rate = Rational::new(1, 10).unwrap();
        let l = Ledgers::new();
        let mut ctx = Context::new(&store, &params, BlockInfo { height: 1, time: T0 });
        setup(&mut ctx, &l);
        // The split rate that matters is the source's: alice keeps 1/3 away
        // from derivatives of her post.
        l.posts
            .create_post(&mut ctx, &post("alice", "src", None, Rational::new(1, 3).unwrap()))
            .unwrap();
        l.posts
            .create_post(
                &mut ctx,
                &post("carol", "remix", Some(Permlink::new("alice", "src")), Rational::new(9, 10).unwrap()),
            )
            .unwrap();

        let amount = 1_000u64;
        let settlement = l.donate(&mut ctx, &donation(Permlink::new("carol", "remix"), amount)).unwrap();
        assert_eq!(settlement.legs.len(), 2);
        let (source_leg, target_leg) = (&settlement.legs[0], &settlement.legs[1]);
        // floor(1000 * 2/3) = 666
        assert_eq!(source_leg.permlink, Permlink::new("alice", "src"));
        assert_eq!(source_leg.original, Coin::new(666));
        assert_eq!(target_leg.original, Coin::new(334));
        for leg in &settlement.legs {
            assert_eq!(leg.direct_deposit.amount + leg.friction.amount, leg.original.amount);
        }
        assert_eq!(settlement.settled().unwrap(), Coin::new(amount));
        assert_eq!(
            l.accounts.get_saving(&ctx, &AccountKey::new("alice")).unwrap(),
            source_leg.direct_deposit
        );
        assert_eq!(
            l.accounts.get_saving(&ctx, &AccountKey::new("carol")).unwrap(),
            target_leg.direct_deposit
        );
    }

    #[test]
    fn test_full_split_rate_skips_target_leg() {
        let store = MemoryStore::new();
        let params = Params::default();
        let l = Ledgers::new();
        let mut ctx = Context::new(&store, &params, BlockInfo { height: 1, time: T0 });
        setup(&mut ctx, &l);
        l.posts
            .create_post(
                &mut ctx,
                &post("carol", "remix", Some(Permlink::new("alice", "orig")), Rational::one()),
            )
            .unwrap();
        // alice's post has split rate 0: everything goes to the source.
        let settlement = l.donate(&mut ctx, &donation(Permlink::new("carol", "remix"), 500)).unwrap();
        assert_eq!(settlement.legs.len(), 1);
        assert_eq!(settlement.legs[0].permlink, Permlink::new("alice", "orig"));
    }

    #[test]
    fn test_self_donation_forbidden() {
        let store = MemoryStore::new();
        let params = Params::default();
        let l = Ledgers::new();
        let mut ctx = Context::new(&store, &params, BlockInfo { height: 1, time: T0 });
        setup(&mut ctx, &l);
        l.posts.create_post(&mut ctx, &post("bob", "mine", None, Rational::zero())).unwrap();
        let before = ctx.store.pending_len();

        let err = l.donate(&mut ctx, &donation(Permlink::new("bob", "mine"), 10)).unwrap_err();
        assert!(matches!(err, LinoError::SelfDonationForbidden(_)));
        assert_eq!(ctx.store.pending_len(), before);
        assert_eq!(l.accounts.get_saving(&ctx, &AccountKey::new("bob")).unwrap(), Coin::new(1_000_000));
    }

    #[test]
    fn test_rejections() {
        let store = MemoryStore::new();
        let params = Params::default();
        let l = Ledgers::new();
        let mut ctx = Context::new(&store, &params, BlockInfo { height: 1, time: T0 });
        setup(&mut ctx, &l);

        let err = l.donate(&mut ctx, &donation(Permlink::new("alice", "orig"), 0)).unwrap_err();
        assert!(matches!(err, LinoError::InvalidCoin(_)));

        let err = l.donate(&mut ctx, &donation(Permlink::new("alice", "nope"), 10)).unwrap_err();
        assert!(matches!(err, LinoError::PostNotFound(_)));

        let mut from_ghost = donation(Permlink::new("alice", "orig"), 10);
        from_ghost.consumer = AccountKey::new("ghost");
        let err = l.donate(&mut ctx, &from_ghost).unwrap_err();
        assert!(matches!(err, LinoError::AccountNotFound(_)));

        let mut via_app = donation(Permlink::new("alice", "orig"), 10);
        via_app.from_app = Some(AccountKey::new("someapp"));
        let err = l.donate(&mut ctx, &via_app).unwrap_err();
        assert!(matches!(err, LinoError::DeveloperNotFound(_)));

        let err = l.donate(&mut ctx, &donation(Permlink::new("alice", "orig"), 2_000_000)).unwrap_err();
        assert!(matches!(err, LinoError::InsufficientBalance(_)));

        l.posts.delete_post(&mut ctx, &Permlink::new("alice", "orig")).unwrap();
        let err = l.donate(&mut ctx, &donation(Permlink::new("alice", "orig"), 10)).unwrap_err();
        assert!(matches!(err, LinoError::PostDeleted(_)));
    }

    #[test]
    fn test_relationship_and_reward_event_recorded() {
        let store = MemoryStore::new();
        let params = Params::default();
        let l = Ledgers::new();
        let mut ctx = Context::new(&store, &params, BlockInfo { height: 1, time: T0 });
        setup(&mut ctx, &l);
        let bob = AccountKey::new("bob");
        let alice = AccountKey::new("alice");

        l.donate(&mut ctx, &donation(Permlink::new("alice", "orig"), 1_000)).unwrap();
        l.donate(&mut ctx, &donation(Permlink::new("alice", "orig"), 1_000)).unwrap();

        assert_eq!(l.accounts.get_donation_relationship(&ctx, &bob, &alice).unwrap(), 2);
        let due = T0 + params.global.reward_event_delay_sec;
        let events = l.global.reward_events_due(&ctx, due).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].1.consumer, bob);
        assert!(l.global.reward_events_due(&ctx, due - 1).unwrap().is_empty());
        assert!(l
            .posts
            .get_report_or_upvote(&ctx, &Permlink::new("alice", "orig"), &bob)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_upvote_weight_is_voting_power() {
        let store = MemoryStore::new();
        let params = Params::default();
        let l = Ledgers::new();
        let mut ctx = Context::new(&store, &params, BlockInfo { height: 1, time: T0 });
        setup(&mut ctx, &l);
        let bob = AccountKey::new("bob");
        let permlink = Permlink::new("alice", "orig");

        // Not a voter yet: the donation lands but carries no upvote weight.
        l.donate(&mut ctx, &donation(permlink.clone(), 10)).unwrap();
        assert_eq!(l.posts.get_meta(&ctx, &permlink).unwrap().total_upvote_stake, Coin::zero());

        let deposit = params.vote.voter_min_deposit;
        l.votes.add_voter(&mut ctx, &bob, deposit).unwrap();
        l.donate(&mut ctx, &donation(permlink.clone(), 10)).unwrap();
        assert_eq!(l.posts.get_meta(&ctx, &permlink).unwrap().total_upvote_stake, deposit);
        assert_eq!(
            l.posts.get_report_or_upvote(&ctx, &permlink, &bob).unwrap().unwrap().stake,
            deposit
        );
    }

    #[test]
    fn test_failed_leg_discards_consumer_debit() {
        let mut store = MemoryStore::new();
        let params = Params::default();
        let l = Ledgers::new();
        let alice = AccountKey::new("alice");
        let bob = AccountKey::new("bob");

        let batch = {
            let mut ctx = Context::new(&store, &params, BlockInfo { height: 1, time: T0 });
            setup(&mut ctx, &l);
            // Any credit to alice now overflows.
            l.accounts.add_balance(&mut ctx, &alice, Coin::new(u64::MAX)).unwrap();
            ctx.into_batch()
        };
        store.write_batch(batch).unwrap();
        let hash_before = lino_store::state_hash(&store).unwrap();

        let mut ctx = Context::new(&store, &params, BlockInfo { height: 2, time: T0 });
        let err = l.donate(&mut ctx, &donation(Permlink::new("alice", "orig"), 100)).unwrap_err();
        assert!(matches!(err, LinoError::ArithmeticInvariantViolation(_)));
        // The debit was staged before the leg failed; dropping the context
        // discards it along with everything else.
        assert_eq!(l.accounts.get_saving(&ctx, &bob).unwrap(), Coin::new(999_900));
        drop(ctx);

        assert_eq!(lino_store::state_hash(&store).unwrap(), hash_before);
        let ctx = Context::new(&store, &params, BlockInfo { height: 2, time: T0 });
        assert_eq!(l.accounts.get_saving(&ctx, &bob).unwrap(), Coin::new(1_000_000));
        assert_eq!(l.accounts.get_saving(&ctx, &alice).unwrap(), Coin::new(u64::MAX));
    }
}
