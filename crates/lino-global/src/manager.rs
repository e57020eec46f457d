// crates/lino-global/src/manager.rs
//
// Global pool state.
//
// Key format:
//   - `global:meta`                      -> GlobalMeta
//   - `global:event:{due:020}:{seq:020}` -> RewardEvent
//
// Friction taken from donations is deposited into the content-creator
// inflation pool. Each registered reward event is queued under the block time
// at which it becomes due (registration time + `reward_event_delay_sec`);
// distributing the pool against due events is done by the inflation
// subsystem, which reads them back with `reward_events_due` and drops the ones
// it has paid out with `remove_reward_events_due`.

use serde::{Deserialize, Serialize};

use lino_core::{Coin, Context, GlobalPool, LinoError, Rational, RewardEvent};

use crate::evaluate::evaluate_consumption;

/// Cumulative pool counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalMeta {
    /// Sum of every donation leg ever settled.
    pub total_consumption: Coin,
    /// Sum of the evaluated value of every registered reward event.
    pub total_evaluate: Coin,
    /// Content-creator inflation pool; receives all consumption friction.
    pub inflation_pool: Coin,
    /// Number of reward events ever registered; doubles as the next sequence.
    pub reward_event_count: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalManager;

const META_KEY: &[u8] = b"global:meta";
const EVENT_PREFIX: &str = "global:event:";

impl GlobalManager {
    pub fn new() -> Self {
        Self
    }

    fn event_key(due: i64, seq: u64) -> Vec<u8> {
        format!("{}{:020}:{:020}", EVENT_PREFIX, due.max(0), seq).into_bytes()
    }

    pub fn get_meta(&self, ctx: &Context) -> Result<GlobalMeta, LinoError> {
        Ok(ctx.store.get_json(META_KEY)?.unwrap_or_default())
    }

    fn set_meta(&self, ctx: &mut Context, meta: &GlobalMeta) -> Result<(), LinoError> {
        ctx.store.set_json(META_KEY.to_vec(), meta)
    }

    fn scan_events_due(&self, ctx: &Context, until: i64) -> Result<Vec<(Vec<u8>, i64, RewardEvent)>, LinoError> {
        let mut due_events = Vec::new();
        for (key, value) in ctx.store.scan_prefix(EVENT_PREFIX.as_bytes())? {
            let suffix = String::from_utf8_lossy(&key[EVENT_PREFIX.len()..]).to_string();
            let due: i64 = suffix
                .split(':')
                .next()
                .and_then(|d| d.parse().ok())
                .ok_or_else(|| LinoError::Storage(format!("malformed reward event key {}", suffix)))?;
            if due > until {
                break;
            }
            due_events.push((key, due, serde_json::from_slice(&value)?));
        }
        Ok(due_events)
    }

    /// Reward events whose due time is at or before `until`, oldest first.
    pub fn reward_events_due(&self, ctx: &Context, until: i64) -> Result<Vec<(i64, RewardEvent)>, LinoError> {
        Ok(self
            .scan_events_due(ctx, until)?
            .into_iter()
            .map(|(_, due, event)| (due, event))
            .collect())
    }

    /// Delete every reward event due at or before `until` and return them,
    /// oldest first. Pool counters are left untouched.
    pub fn remove_reward_events_due(
        &self,
        ctx: &mut Context,
        until: i64,
    ) -> Result<Vec<(i64, RewardEvent)>, LinoError> {
        let due_events = self.scan_events_due(ctx, until)?;
        let mut removed = Vec::with_capacity(due_events.len());
        for (key, due, event) in due_events {
            ctx.store.delete(key);
            removed.push((due, event));
        }
        tracing::debug!("Removed {} reward events due by {}", removed.len(), until);
        Ok(removed)
    }
}

impl GlobalPool for GlobalManager {
    fn get_consumption_friction_rate(&self, ctx: &Context) -> Result<Rational, LinoError> {
        let rate = ctx.params.global.consumption_friction_rate;
        if !rate.is_unit_interval() {
            return Err(LinoError::ArithmeticInvariantViolation(format!(
                "consumption friction rate {} exceeds 1",
                rate
            )));
        }
        Ok(rate)
    }

    fn add_consumption(&self, ctx: &mut Context, coin: Coin) -> Result<(), LinoError> {
        let mut meta = self.get_meta(ctx)?;
        meta.total_consumption = meta.total_consumption.plus(coin)?;
        self.set_meta(ctx, &meta)
    }

    fn evaluate_consumption(
        &self,
        ctx: &Context,
        coin: Coin,
        relationship_count: u64,
        created_at: i64,
        total_reward: Coin,
    ) -> Result<Coin, LinoError> {
        evaluate_consumption(
            &ctx.params.evaluate,
            coin,
            relationship_count,
            created_at,
            ctx.block_time(),
            total_reward,
        )
    }

    fn add_friction_and_register_reward_event(
        &self,
        ctx: &mut Context,
        event: RewardEvent,
        friction: Coin,
        evaluate: Coin,
    ) -> Result<(), LinoError> {
        if event.friction != friction || event.evaluate != evaluate || !event.original.is_gte(friction) {
            return Err(LinoError::ArithmeticInvariantViolation(format!(
                "inconsistent reward event for {}#{}: original {}, friction {}",
                event.post_author, event.post_id, event.original, friction
            )));
        }
        let mut meta = self.get_meta(ctx)?;
        meta.inflation_pool = meta.inflation_pool.plus(friction)?;
        meta.total_evaluate = meta.total_evaluate.plus(evaluate)?;
        let seq = meta.reward_event_count;
        meta.reward_event_count += 1;

        let due = ctx.block_time().saturating_add(ctx.params.global.reward_event_delay_sec);
        tracing::debug!(
            "Registered reward event #{} for {}#{} due at {} (friction {}, evaluate {})",
            seq,
            event.post_author,
            event.post_id,
            due,
            friction,
            evaluate
        );
        ctx.store.set_json(Self::event_key(due, seq), &event)?;
        self.set_meta(ctx, &meta)
    }
}
