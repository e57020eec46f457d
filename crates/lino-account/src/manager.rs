// crates/lino-account/src/manager.rs
//
// Account ledger.
//
// Key format:
//   - `account:info:{username}`                  -> AccountInfo
//   - `account:bank:{username}`                  -> AccountBank
//   - `account:meta:{username}`                  -> AccountMeta
//   - `account:relationship:{consumer}:{author}` -> Relationship
//
// Raw account registration and key management live outside the ledger;
// `create_account` exists for genesis loading.

use lino_core::{AccountKey, AccountLedger, Coin, Context, LinoError};

use crate::model::{AccountBank, AccountInfo, AccountMeta, Relationship};

/// Stateless handle over the account keyspace.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountManager;

impl AccountManager {
    pub fn new() -> Self {
        Self
    }

    fn info_key(user: &AccountKey) -> Vec<u8> {
        format!("account:info:{}", user).into_bytes()
    }

    fn bank_key(user: &AccountKey) -> Vec<u8> {
        format!("account:bank:{}", user).into_bytes()
    }

    fn meta_key(user: &AccountKey) -> Vec<u8> {
        format!("account:meta:{}", user).into_bytes()
    }

    fn relationship_key(consumer: &AccountKey, author: &AccountKey) -> Vec<u8> {
        format!("account:relationship:{}:{}", consumer, author).into_bytes()
    }

    /// Register an account with an opening balance.
    ///
    /// # Errors
    /// `InvalidMessage` for a malformed username, `AccountAlreadyExists` if taken.
    pub fn create_account(
        &self,
        ctx: &mut Context,
        username: &AccountKey,
        initial: Coin,
    ) -> Result<(), LinoError> {
        if !username.is_valid() {
            return Err(LinoError::InvalidMessage(format!("illegal username {:?}", username.as_str())));
        }
        if self.does_account_exist(ctx, username)? {
            return Err(LinoError::AccountAlreadyExists(username.to_string()));
        }
        let info = AccountInfo {
            username: username.clone(),
            created_at: ctx.block_time(),
        };
        ctx.store.set_json(Self::info_key(username), &info)?;
        ctx.store
            .set_json(Self::bank_key(username), &AccountBank { saving: initial })?;
        ctx.store
            .set_json(Self::meta_key(username), &AccountMeta::default())?;
        Ok(())
    }

    pub fn get_info(&self, ctx: &Context, user: &AccountKey) -> Result<AccountInfo, LinoError> {
        ctx.store
            .get_json(&Self::info_key(user))?
            .ok_or_else(|| LinoError::AccountNotFound(user.to_string()))
    }

    pub fn get_bank(&self, ctx: &Context, user: &AccountKey) -> Result<AccountBank, LinoError> {
        ctx.store
            .get_json(&Self::bank_key(user))?
            .ok_or_else(|| LinoError::AccountNotFound(user.to_string()))
    }

    pub fn get_meta(&self, ctx: &Context, user: &AccountKey) -> Result<AccountMeta, LinoError> {
        ctx.store
            .get_json(&Self::meta_key(user))?
            .ok_or_else(|| LinoError::AccountNotFound(user.to_string()))
    }

    pub fn get_saving(&self, ctx: &Context, user: &AccountKey) -> Result<Coin, LinoError> {
        Ok(self.get_bank(ctx, user)?.saving)
    }

    fn set_bank(&self, ctx: &mut Context, user: &AccountKey, bank: &AccountBank) -> Result<(), LinoError> {
        ctx.store.set_json(Self::bank_key(user), bank)
    }

    fn update_meta(
        &self,
        ctx: &mut Context,
        user: &AccountKey,
        f: impl FnOnce(&mut AccountMeta) -> Result<(), LinoError>,
    ) -> Result<(), LinoError> {
        let mut meta = self.get_meta(ctx, user)?;
        f(&mut meta)?;
        ctx.store.set_json(Self::meta_key(user), &meta)
    }
}

impl AccountLedger for AccountManager {
    fn does_account_exist(&self, ctx: &Context, key: &AccountKey) -> Result<bool, LinoError> {
        ctx.store.has(&Self::info_key(key))
    }

    fn minus_balance(&self, ctx: &mut Context, key: &AccountKey, coin: Coin) -> Result<(), LinoError> {
        let mut bank = self.get_bank(ctx, key)?;
        if !bank.saving.is_gte(coin) {
            return Err(LinoError::InsufficientBalance(format!(
                "{} has {} but needs {}",
                key, bank.saving, coin
            )));
        }
        bank.saving = bank.saving.minus(coin)?;
        self.set_bank(ctx, key, &bank)
    }

    fn add_balance(&self, ctx: &mut Context, key: &AccountKey, coin: Coin) -> Result<(), LinoError> {
        let mut bank = self.get_bank(ctx, key)?;
        bank.saving = bank.saving.plus(coin)?;
        self.set_bank(ctx, key, &bank)
    }

    fn add_direct_deposit(&self, ctx: &mut Context, key: &AccountKey, coin: Coin) -> Result<(), LinoError> {
        self.update_meta(ctx, key, |meta| {
            meta.total_direct_deposit = meta.total_direct_deposit.plus(coin)?;
            Ok(())
        })
    }

    fn get_last_post_at(&self, ctx: &Context, key: &AccountKey) -> Result<i64, LinoError> {
        Ok(self.get_meta(ctx, key)?.last_post_at)
    }

    fn update_last_post_at(&self, ctx: &mut Context, key: &AccountKey) -> Result<(), LinoError> {
        let now = ctx.block_time();
        self.update_meta(ctx, key, |meta| {
            meta.last_post_at = now;
            meta.last_activity_at = now;
            Ok(())
        })
    }

    fn get_last_report_or_upvote_at(&self, ctx: &Context, key: &AccountKey) -> Result<i64, LinoError> {
        Ok(self.get_meta(ctx, key)?.last_report_or_upvote_at)
    }

    fn update_last_report_or_upvote_at(&self, ctx: &mut Context, key: &AccountKey) -> Result<(), LinoError> {
        let now = ctx.block_time();
        self.update_meta(ctx, key, |meta| {
            meta.last_report_or_upvote_at = now;
            meta.last_activity_at = now;
            Ok(())
        })
    }

    fn update_last_activity(&self, ctx: &mut Context, key: &AccountKey) -> Result<(), LinoError> {
        let now = ctx.block_time();
        self.update_meta(ctx, key, |meta| {
            meta.last_activity_at = now;
            Ok(())
        })
    }

    fn get_donation_relationship(
        &self,
        ctx: &Context,
        consumer: &AccountKey,
        author: &AccountKey,
    ) -> Result<u64, LinoError> {
        let rel: Option<Relationship> = ctx.store.get_json(&Self::relationship_key(consumer, author))?;
        Ok(rel.map(|r| r.donation_times).unwrap_or(0))
    }

    fn increment_donation_relationship(
        &self,
        ctx: &mut Context,
        consumer: &AccountKey,
        author: &AccountKey,
    ) -> Result<(), LinoError> {
        let key = Self::relationship_key(consumer, author);
        let mut rel: Relationship = ctx.store.get_json(&key)?.unwrap_or_default();
        rel.donation_times += 1;
        ctx.store.set_json(key, &rel)
    }
}
