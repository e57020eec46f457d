// crates/lino-account/src/developer.rs
//
// Registry of applications that donations can be attributed to.
//
// Key format: `developer:{username}` -> Developer
//
// Registration locks a deposit taken from the developer's saving balance.

use serde::{Deserialize, Serialize};

use lino_core::{AccountKey, AccountLedger, Coin, Context, DeveloperRegistry, LinoError};

use crate::manager::AccountManager;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Developer {
    pub username: AccountKey,
    pub deposit: Coin,
    pub registered_at: i64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeveloperManager {
    accounts: AccountManager,
}

impl DeveloperManager {
    pub fn new(accounts: AccountManager) -> Self {
        Self { accounts }
    }

    fn developer_key(user: &AccountKey) -> Vec<u8> {
        format!("developer:{}", user).into_bytes()
    }

    /// Register `username` as a developer, debiting `deposit` from its balance.
    ///
    /// # Errors
    /// `AccountNotFound`, `DeveloperAlreadyExists`, `InsufficientDeposit` when
    /// `deposit` is below the developer minimum, `InsufficientBalance`.
    pub fn register_developer(
        &self,
        ctx: &mut Context,
        username: &AccountKey,
        deposit: Coin,
    ) -> Result<(), LinoError> {
        if !self.accounts.does_account_exist(ctx, username)? {
            return Err(LinoError::AccountNotFound(username.to_string()));
        }
        if self.does_developer_exist(ctx, username)? {
            return Err(LinoError::DeveloperAlreadyExists(username.to_string()));
        }
        let min = ctx.params.developer.developer_min_deposit;
        if !deposit.is_gte(min) {
            return Err(LinoError::InsufficientDeposit(format!(
                "developer deposit {} is below minimum {}",
                deposit, min
            )));
        }
        self.accounts.minus_balance(ctx, username, deposit)?;
        let developer = Developer {
            username: username.clone(),
            deposit,
            registered_at: ctx.block_time(),
        };
        ctx.store.set_json(Self::developer_key(username), &developer)?;
        tracing::debug!("Registered developer {} with deposit {}", username, deposit);
        Ok(())
    }

    pub fn get_developer(&self, ctx: &Context, username: &AccountKey) -> Result<Developer, LinoError> {
        ctx.store
            .get_json(&Self::developer_key(username))?
            .ok_or_else(|| LinoError::DeveloperNotFound(username.to_string()))
    }
}

impl DeveloperRegistry for DeveloperManager {
    fn does_developer_exist(&self, ctx: &Context, key: &AccountKey) -> Result<bool, LinoError> {
        ctx.store.has(&Self::developer_key(key))
    }
}
