// crates/lino-post/src/manager.rs
//
// Post ledger.
//
// Key format:
//   - `post:info:{author}#{post_id}`                        -> PostInfo
//   - `post:meta:{author}#{post_id}`                        -> PostMeta
//   - `post:donation:{author}#{post_id}:{user}`             -> Donations
//   - `post:report_or_upvote:{author}#{post_id}:{user}`     -> ReportOrUpvote
//   - `post:view:{author}#{post_id}:{user}`                 -> View
//   - `post:comment:{author}#{post_id}:{child_author}#{child_id}` -> Comment
//
// Post ids never contain `:` or `#`, so every per-post prefix is unambiguous.
// Deletion is terminal: a deleted post keeps its meta record (so its permlink
// can never be reused) but its content is cleared.

use lino_core::{AccountKey, Coin, Context, DonationKind, LinoError, Permlink, PostLedger, Rational};

use crate::model::{Comment, Donations, PostInfo, PostLink, PostMeta, ReportOrUpvote, View};

/// Everything needed to create a post, already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub info: PostInfo,
    pub redistribution_split_rate: Rational,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostManager;

impl PostManager {
    pub fn new() -> Self {
        Self
    }

    fn info_key(permlink: &Permlink) -> Vec<u8> {
        format!("post:info:{}", permlink).into_bytes()
    }

    fn meta_key(permlink: &Permlink) -> Vec<u8> {
        format!("post:meta:{}", permlink).into_bytes()
    }

    fn donation_key(permlink: &Permlink, user: &AccountKey) -> Vec<u8> {
        format!("post:donation:{}:{}", permlink, user).into_bytes()
    }

    fn report_or_upvote_key(permlink: &Permlink, user: &AccountKey) -> Vec<u8> {
        format!("post:report_or_upvote:{}:{}", permlink, user).into_bytes()
    }

    fn view_key(permlink: &Permlink, user: &AccountKey) -> Vec<u8> {
        format!("post:view:{}:{}", permlink, user).into_bytes()
    }

    fn comment_prefix(parent: &Permlink) -> String {
        format!("post:comment:{}:", parent)
    }

    pub fn get_info(&self, ctx: &Context, permlink: &Permlink) -> Result<PostInfo, LinoError> {
        ctx.store
            .get_json(&Self::info_key(permlink))?
            .ok_or_else(|| LinoError::PostNotFound(permlink.to_string()))
    }

    pub fn get_meta(&self, ctx: &Context, permlink: &Permlink) -> Result<PostMeta, LinoError> {
        ctx.store
            .get_json(&Self::meta_key(permlink))?
            .ok_or_else(|| LinoError::PostNotFound(permlink.to_string()))
    }

    fn set_meta(&self, ctx: &mut Context, permlink: &Permlink, meta: &PostMeta) -> Result<(), LinoError> {
        ctx.store.set_json(Self::meta_key(permlink), meta)
    }

    /// Fetch the meta record of a live post.
    fn get_live_meta(&self, ctx: &Context, permlink: &Permlink) -> Result<PostMeta, LinoError> {
        let meta = self.get_meta(ctx, permlink)?;
        if meta.is_deleted {
            return Err(LinoError::PostDeleted(permlink.to_string()));
        }
        Ok(meta)
    }

    /// Persist a new post.
    ///
    /// # Errors
    /// `PostAlreadyExists` if the permlink was ever used, `InvalidSplitRate`
    /// if the split rate exceeds 1.
    pub fn create_post(&self, ctx: &mut Context, post: &NewPost) -> Result<(), LinoError> {
        let permlink = Permlink::new(post.info.author.clone(), post.info.post_id.clone());
        if self.does_post_exist(ctx, &permlink)? {
            return Err(LinoError::PostAlreadyExists(permlink.to_string()));
        }
        if !post.redistribution_split_rate.is_unit_interval() {
            return Err(LinoError::InvalidSplitRate(post.redistribution_split_rate.to_string()));
        }
        let now = ctx.block_time();
        let meta = PostMeta {
            created_at: now,
            last_updated_at: now,
            last_activity_at: now,
            redistribution_split_rate: post.redistribution_split_rate,
            total_donate_count: 0,
            total_reward: Coin::zero(),
            total_upvote_stake: Coin::zero(),
            total_report_stake: Coin::zero(),
            total_view_count: 0,
            is_deleted: false,
        };
        ctx.store.set_json(Self::info_key(&permlink), &post.info)?;
        self.set_meta(ctx, &permlink, &meta)?;
        tracing::debug!("Created post {}", permlink);
        Ok(())
    }

    /// Replace the title, content and links of a live post.
    pub fn update_post(
        &self,
        ctx: &mut Context,
        permlink: &Permlink,
        title: &str,
        content: &str,
        links: &[PostLink],
    ) -> Result<(), LinoError> {
        let mut meta = self.get_live_meta(ctx, permlink)?;
        let mut info = self.get_info(ctx, permlink)?;
        info.title = title.to_string();
        info.content = content.to_string();
        info.links = links.to_vec();
        meta.last_updated_at = ctx.block_time();
        ctx.store.set_json(Self::info_key(permlink), &info)?;
        self.set_meta(ctx, permlink, &meta)
    }

    /// Mark a post deleted and clear its content.
    pub fn delete_post(&self, ctx: &mut Context, permlink: &Permlink) -> Result<(), LinoError> {
        let mut meta = self.get_live_meta(ctx, permlink)?;
        let mut info = self.get_info(ctx, permlink)?;
        info.title.clear();
        info.content.clear();
        info.links.clear();
        meta.is_deleted = true;
        meta.last_updated_at = ctx.block_time();
        ctx.store.set_json(Self::info_key(permlink), &info)?;
        self.set_meta(ctx, permlink, &meta)?;
        tracing::debug!("Deleted post {}", permlink);
        Ok(())
    }

    /// Count one view of the post by `user`.
    pub fn add_or_update_view(&self, ctx: &mut Context, permlink: &Permlink, user: &AccountKey) -> Result<(), LinoError> {
        let mut meta = self.get_live_meta(ctx, permlink)?;
        let key = Self::view_key(permlink, user);
        let now = ctx.block_time();
        let mut view = ctx.store.get_json::<View>(&key)?.unwrap_or(View {
            username: user.clone(),
            times: 0,
            last_view_at: now,
        });
        view.times += 1;
        view.last_view_at = now;
        meta.total_view_count += 1;
        ctx.store.set_json(key, &view)?;
        self.set_meta(ctx, permlink, &meta)
    }

    /// Link `child` as a comment of the live post `parent`.
    pub fn add_comment(&self, ctx: &mut Context, parent: &Permlink, child: &Permlink) -> Result<(), LinoError> {
        let mut meta = self.get_live_meta(ctx, parent)?;
        let comment = Comment {
            author: child.author.clone(),
            post_id: child.post_id.clone(),
            created_at: ctx.block_time(),
        };
        meta.last_activity_at = ctx.block_time();
        let key = format!("{}{}", Self::comment_prefix(parent), child).into_bytes();
        ctx.store.set_json(key, &comment)?;
        self.set_meta(ctx, parent, &meta)
    }

    pub fn get_comments(&self, ctx: &Context, parent: &Permlink) -> Result<Vec<Comment>, LinoError> {
        ctx.store
            .scan_prefix(Self::comment_prefix(parent).as_bytes())?
            .into_iter()
            .map(|(_, value)| Ok(serde_json::from_slice(&value)?))
            .collect()
    }

    pub fn get_donations(
        &self,
        ctx: &Context,
        permlink: &Permlink,
        user: &AccountKey,
    ) -> Result<Option<Donations>, LinoError> {
        ctx.store.get_json(&Self::donation_key(permlink, user))
    }

    pub fn get_report_or_upvote(
        &self,
        ctx: &Context,
        permlink: &Permlink,
        user: &AccountKey,
    ) -> Result<Option<ReportOrUpvote>, LinoError> {
        ctx.store.get_json(&Self::report_or_upvote_key(permlink, user))
    }

    pub fn get_view(&self, ctx: &Context, permlink: &Permlink, user: &AccountKey) -> Result<Option<View>, LinoError> {
        ctx.store.get_json(&Self::view_key(permlink, user))
    }
}

impl PostLedger for PostManager {
    fn does_post_exist(&self, ctx: &Context, permlink: &Permlink) -> Result<bool, LinoError> {
        ctx.store.has(&Self::info_key(permlink))
    }

    fn is_deleted(&self, ctx: &Context, permlink: &Permlink) -> Result<bool, LinoError> {
        Ok(self.get_meta(ctx, permlink)?.is_deleted)
    }

    fn get_source_post(&self, ctx: &Context, permlink: &Permlink) -> Result<Option<Permlink>, LinoError> {
        Ok(self.get_info(ctx, permlink)?.source)
    }

    fn get_redistribution_split_rate(&self, ctx: &Context, permlink: &Permlink) -> Result<Rational, LinoError> {
        Ok(self.get_meta(ctx, permlink)?.redistribution_split_rate)
    }

    fn add_donation(
        &self,
        ctx: &mut Context,
        permlink: &Permlink,
        consumer: &AccountKey,
        coin: Coin,
        kind: DonationKind,
    ) -> Result<(), LinoError> {
        let mut meta = self.get_meta(ctx, permlink)?;
        let key = Self::donation_key(permlink, consumer);
        let mut donations = ctx.store.get_json::<Donations>(&key)?.unwrap_or(Donations {
            username: consumer.clone(),
            times: 0,
            amount: Coin::zero(),
        });
        donations.times += 1;
        donations.amount = donations.amount.plus(coin)?;
        match kind {
            DonationKind::DirectDeposit => {
                meta.total_reward = meta.total_reward.plus(coin)?;
            }
        }
        meta.total_donate_count += 1;
        meta.last_activity_at = ctx.block_time();
        ctx.store.set_json(key, &donations)?;
        self.set_meta(ctx, permlink, &meta)
    }

    fn get_created_time_and_total_reward(&self, ctx: &Context, permlink: &Permlink) -> Result<(i64, Coin), LinoError> {
        let meta = self.get_meta(ctx, permlink)?;
        Ok((meta.created_at, meta.total_reward))
    }

    fn report_or_upvote(
        &self,
        ctx: &mut Context,
        permlink: &Permlink,
        user: &AccountKey,
        stake: Coin,
        is_report: bool,
    ) -> Result<(), LinoError> {
        let mut meta = self.get_meta(ctx, permlink)?;
        let key = Self::report_or_upvote_key(permlink, user);

        // The latest record replaces the earlier one in the post totals.
        if let Some(previous) = ctx.store.get_json::<ReportOrUpvote>(&key)? {
            if previous.is_report {
                meta.total_report_stake = meta.total_report_stake.minus(previous.stake)?;
            } else {
                meta.total_upvote_stake = meta.total_upvote_stake.minus(previous.stake)?;
            }
        }
        if is_report {
            meta.total_report_stake = meta.total_report_stake.plus(stake)?;
        } else {
            meta.total_upvote_stake = meta.total_upvote_stake.plus(stake)?;
        }
        meta.last_activity_at = ctx.block_time();

        let record = ReportOrUpvote {
            username: user.clone(),
            stake,
            is_report,
            created_at: ctx.block_time(),
        };
        ctx.store.set_json(key, &record)?;
        self.set_meta(ctx, permlink, &meta)
    }
}
