//! Core staking pool engine.

use crate::error::PoolError;
use crate::state::{DepositId, DepositInfo, UserInfo, ACC_PRECISION};
use harvest_ledger::TokenLedger;
use harvest_types::{AccountId, PoolParams, Timestamp, TOKEN_UNIT};
use std::collections::HashMap;

/// Ledger account holding the pool's staked principal and reward supply.
pub const POOL_ACCOUNT: &str = "pool";

/// Reward payouts are rounded to this quantum (0.0001 token, half up).
const REWARD_QUANTUM: u128 = TOKEN_UNIT / 10_000;

/// The staking pool — locked deposits earning a continuously distributed
/// reward via accumulated-per-share accounting.
///
/// `acc_token_per_share` carries the cumulative reward per staked raw unit
/// (scaled by [`ACC_PRECISION`]) and only ever grows; each deposit's
/// `reward_debt` marks how much of it was already settled for that slot.
/// Time enters exclusively through the `now` parameter on each operation.
#[derive(Debug)]
pub struct StakingPool {
    staked_ledger: TokenLedger,
    reward_ledger: TokenLedger,
    pool_account: AccountId,
    params: PoolParams,
    /// High-water mark of accrual.
    last_reward_time: Timestamp,
    /// Cumulative reward per staked raw unit, scaled by `ACC_PRECISION`.
    acc_token_per_share: u128,
    total_staking: u128,
    /// Undistributed reward balance held by the pool.
    total_rewards: u128,
    paused: bool,
    users: HashMap<AccountId, UserInfo>,
}

/// Point-in-time snapshot of the pool's aggregate state.
#[derive(Clone, Debug)]
pub struct PoolSummary {
    pub stakers: usize,
    pub total_staking: u128,
    pub total_rewards: u128,
    pub acc_token_per_share: u128,
    pub last_reward_time: Timestamp,
    pub paused: bool,
}

impl StakingPool {
    /// Create a pool over the two ledgers with a fixed schedule.
    pub fn new(
        staked_ledger: TokenLedger,
        reward_ledger: TokenLedger,
        params: PoolParams,
    ) -> Result<Self, PoolError> {
        if params.end_time <= params.start_time {
            return Err(PoolError::InvalidParams(
                "end_time must be after start_time".into(),
            ));
        }
        if params.lock_duration_secs == 0 {
            return Err(PoolError::InvalidParams(
                "lock_duration_secs must be non-zero".into(),
            ));
        }
        let last_reward_time = params.start_time;
        Ok(Self {
            staked_ledger,
            reward_ledger,
            pool_account: AccountId::new(POOL_ACCOUNT),
            params,
            last_reward_time,
            acc_token_per_share: 0,
            total_staking: 0,
            total_rewards: 0,
            paused: false,
            users: HashMap::new(),
        })
    }

    /// Stake into a freshly allocated deposit slot. Returns the new slot id.
    pub fn deposit(
        &mut self,
        staker: &AccountId,
        amount: u128,
        now: Timestamp,
    ) -> Result<DepositId, PoolError> {
        self.ensure_can_deposit(amount, now)?;
        self.update_pool(now)?;
        let deposit_id = self.users.entry(staker.clone()).or_default().allocate_slot();
        self.deposit_into_slot(staker, deposit_id, amount, now)?;
        tracing::debug!(staker = %staker, deposit_id, amount, "deposit");
        Ok(deposit_id)
    }

    /// Stake into an already allocated slot, restarting its lock.
    ///
    /// The slot may be fully withdrawn (`amount == 0`); topping it up
    /// re-uses the id. Ids that were never allocated are rejected rather
    /// than allocated implicitly.
    pub fn deposit_into(
        &mut self,
        staker: &AccountId,
        deposit_id: DepositId,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), PoolError> {
        self.ensure_can_deposit(amount, now)?;
        self.update_pool(now)?;
        let allocated = self
            .users
            .get(staker)
            .map_or(false, |u| deposit_id < u.next_deposit_id);
        if !allocated {
            return Err(PoolError::DepositNotFound(deposit_id));
        }
        self.deposit_into_slot(staker, deposit_id, amount, now)?;
        tracing::debug!(staker = %staker, deposit_id, amount, "deposit top-up");
        Ok(())
    }

    /// Withdraw principal from a slot whose lock has expired, paying out the
    /// slot's accumulated reward. Returns the reward amount paid.
    ///
    /// The withdrawal is transactional: every precondition, including the
    /// reward supply covering the rounded payout, is checked before any
    /// state mutation. A failed withdraw leaves the deposit untouched.
    pub fn withdraw(
        &mut self,
        staker: &AccountId,
        amount: u128,
        deposit_id: DepositId,
        now: Timestamp,
    ) -> Result<u128, PoolError> {
        if self.paused {
            return Err(PoolError::WithdrawFrozen);
        }
        if amount == 0 {
            return Err(PoolError::InvalidAmount);
        }
        let deposit = self
            .users
            .get(staker)
            .and_then(|u| u.deposit(deposit_id))
            .cloned()
            .unwrap_or_default();
        if deposit.amount < amount {
            return Err(PoolError::AmountTooHigh {
                requested: amount,
                available: deposit.amount,
            });
        }
        if deposit.is_locked(now) {
            return Err(PoolError::InvalidTimeToWithdraw {
                unlock_at: deposit.lock_to,
            });
        }

        self.update_pool(now)?;
        let acc = self.acc_token_per_share;
        let pending = deposit.pending_total(acc).ok_or(PoolError::Overflow)?;
        let payout = round_reward(pending).ok_or(PoolError::Overflow)?;
        if payout > self.total_rewards {
            return Err(PoolError::InsufficientRewardSupply {
                needed: payout,
                available: self.total_rewards,
            });
        }
        let new_amount = deposit.amount - amount;
        let new_debt = new_amount.checked_mul(acc).ok_or(PoolError::Overflow)? / ACC_PRECISION;
        let new_total_staking = self
            .total_staking
            .checked_sub(amount)
            .ok_or(PoolError::Overflow)?;

        if let Some(user) = self.users.get_mut(staker) {
            user.total_amount = user.total_amount.saturating_sub(amount);
            if let Some(slot) = user.deposit_mut(deposit_id) {
                slot.amount = new_amount;
                slot.reward_debt = new_debt;
                slot.reward_pending = 0;
            }
        }
        self.total_staking = new_total_staking;

        if payout > 0 {
            self.total_rewards -= payout;
            self.reward_ledger
                .transfer(&self.pool_account, staker, payout)?;
            tracing::debug!(staker = %staker, payout, "reward paid");
        }
        self.staked_ledger
            .transfer(&self.pool_account, staker, amount)?;
        tracing::debug!(staker = %staker, deposit_id, amount, "withdraw");
        Ok(payout)
    }

    /// Reward a slot would collect if withdrawn at `now`, without mutating
    /// any state. `None` if the deposit does not exist (or the hypothetical
    /// accrual overflows).
    pub fn pending_reward(
        &self,
        staker: &AccountId,
        deposit_id: DepositId,
        now: Timestamp,
    ) -> Option<u128> {
        let deposit = self.users.get(staker)?.deposit(deposit_id)?;
        let mut acc = self.acc_token_per_share;
        if now > self.last_reward_time && self.total_staking != 0 {
            let reward = (self.multiplier(self.last_reward_time, now) as u128)
                .checked_mul(self.params.reward_per_second)?;
            let delta = reward.checked_mul(ACC_PRECISION)? / self.total_staking;
            acc = acc.checked_add(delta)?;
        }
        deposit.pending_total(acc)
    }

    /// Freeze or unfreeze deposits and withdrawals.
    pub fn pause(&mut self, status: bool) {
        self.paused = status;
        tracing::info!(paused = status, "pool pause set");
    }

    /// Mint `amount` reward tokens into the pool's undistributed supply.
    pub fn add_reward_tokens(&mut self, amount: u128) -> Result<(), PoolError> {
        let new_total = self
            .total_rewards
            .checked_add(amount)
            .ok_or(PoolError::Overflow)?;
        self.reward_ledger.mint(&self.pool_account, amount)?;
        self.total_rewards = new_total;
        tracing::debug!(amount, "reward supply topped up");
        Ok(())
    }

    /// Reward multiplier over `[from, to]`, clipped to the mining window.
    ///
    /// Accrual never starts before `last_reward_time` (which is initialized
    /// to `start_time`), so only the upper bound needs clipping.
    pub fn multiplier(&self, from: Timestamp, to: Timestamp) -> u64 {
        let end = self.params.end_time;
        if to <= end {
            from.elapsed_since(to)
        } else if from >= end {
            0
        } else {
            from.elapsed_since(end)
        }
    }

    /// Bring `acc_token_per_share` current up to `now`.
    ///
    /// While nothing is staked there is no share to accrue to: the interval
    /// is skipped by fast-forwarding `last_reward_time`, forfeiting its
    /// reward.
    fn update_pool(&mut self, now: Timestamp) -> Result<(), PoolError> {
        if self.total_staking == 0 {
            self.last_reward_time = now;
            return Ok(());
        }
        if now <= self.last_reward_time {
            return Ok(());
        }
        let reward = (self.multiplier(self.last_reward_time, now) as u128)
            .checked_mul(self.params.reward_per_second)
            .ok_or(PoolError::Overflow)?;
        let delta = reward
            .checked_mul(ACC_PRECISION)
            .ok_or(PoolError::Overflow)?
            / self.total_staking;
        self.acc_token_per_share = self
            .acc_token_per_share
            .checked_add(delta)
            .ok_or(PoolError::Overflow)?;
        self.last_reward_time = now;
        Ok(())
    }

    fn ensure_can_deposit(&self, amount: u128, now: Timestamp) -> Result<(), PoolError> {
        if self.paused {
            return Err(PoolError::DepositFrozen);
        }
        if !self.params.contains(now) {
            return Err(PoolError::InvalidTime(now));
        }
        if amount == 0 {
            return Err(PoolError::InvalidAmount);
        }
        Ok(())
    }

    /// Shared deposit tail: settle, pull funds, grow the slot, restart lock.
    ///
    /// The unsettled reward and all new totals are computed before the
    /// staked-token transfer; a transfer failure therefore leaves the slot
    /// exactly as it was.
    fn deposit_into_slot(
        &mut self,
        staker: &AccountId,
        deposit_id: DepositId,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), PoolError> {
        let acc = self.acc_token_per_share;
        let (new_pending, new_amount, new_debt, new_user_total) = {
            let user = self
                .users
                .get(staker)
                .ok_or(PoolError::DepositNotFound(deposit_id))?;
            let slot = user
                .deposit(deposit_id)
                .ok_or(PoolError::DepositNotFound(deposit_id))?;
            let unsettled = if slot.amount > 0 {
                slot.unsettled(acc).ok_or(PoolError::Overflow)?
            } else {
                0
            };
            let new_pending = slot
                .reward_pending
                .checked_add(unsettled)
                .ok_or(PoolError::Overflow)?;
            let new_amount = slot.amount.checked_add(amount).ok_or(PoolError::Overflow)?;
            let new_debt = new_amount.checked_mul(acc).ok_or(PoolError::Overflow)? / ACC_PRECISION;
            let new_user_total = user
                .total_amount
                .checked_add(amount)
                .ok_or(PoolError::Overflow)?;
            (new_pending, new_amount, new_debt, new_user_total)
        };
        let new_total_staking = self
            .total_staking
            .checked_add(amount)
            .ok_or(PoolError::Overflow)?;

        self.staked_ledger
            .transfer(staker, &self.pool_account, amount)?;

        self.total_staking = new_total_staking;
        let lock_to = self.params.lock_expiry(now);
        if let Some(user) = self.users.get_mut(staker) {
            user.total_amount = new_user_total;
            if let Some(slot) = user.deposit_mut(deposit_id) {
                slot.amount = new_amount;
                slot.lock_from = now;
                slot.lock_to = lock_to;
                slot.reward_debt = new_debt;
                slot.reward_pending = new_pending;
            }
        }
        Ok(())
    }

    // ── Read accessors ──────────────────────────────────────────────────

    pub fn staked_ledger(&self) -> &TokenLedger {
        &self.staked_ledger
    }

    pub fn reward_ledger(&self) -> &TokenLedger {
        &self.reward_ledger
    }

    pub fn pool_account(&self) -> &AccountId {
        &self.pool_account
    }

    pub fn params(&self) -> &PoolParams {
        &self.params
    }

    pub fn user_info(&self, staker: &AccountId) -> Option<&UserInfo> {
        self.users.get(staker)
    }

    /// Iterate every staker record ever created.
    pub fn users(&self) -> impl Iterator<Item = (&AccountId, &UserInfo)> {
        self.users.iter()
    }

    pub fn deposit_info(&self, staker: &AccountId, deposit_id: DepositId) -> Option<&DepositInfo> {
        self.users.get(staker)?.deposit(deposit_id)
    }

    pub fn acc_token_per_share(&self) -> u128 {
        self.acc_token_per_share
    }

    pub fn total_staking_tokens(&self) -> u128 {
        self.total_staking
    }

    pub fn total_reward_tokens(&self) -> u128 {
        self.total_rewards
    }

    pub fn last_reward_time(&self) -> Timestamp {
        self.last_reward_time
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn summary(&self) -> PoolSummary {
        PoolSummary {
            stakers: self.users.len(),
            total_staking: self.total_staking,
            total_rewards: self.total_rewards,
            acc_token_per_share: self.acc_token_per_share,
            last_reward_time: self.last_reward_time,
            paused: self.paused,
        }
    }
}

/// Round a raw reward amount to the nearest `REWARD_QUANTUM`, half up.
fn round_reward(amount: u128) -> Option<u128> {
    let bumped = amount.checked_add(REWARD_QUANTUM / 2)?;
    Some(bumped / REWARD_QUANTUM * REWARD_QUANTUM)
}
