//! Per-staker state and per-deposit accounting.

use harvest_types::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of a deposit slot, unique per staker.
pub type DepositId = u64;

/// Scaling factor for `acc_token_per_share`.
///
/// The accumulator tracks reward raw units per staked raw unit, which is a
/// tiny fraction; storing it premultiplied by `ACC_PRECISION` keeps the
/// arithmetic in integers. Rewards owed are always
/// `amount * acc / ACC_PRECISION`.
pub const ACC_PRECISION: u128 = 1_000_000_000_000;

/// Aggregate record for one staker.
///
/// Created lazily on the first deposit and never removed, even when every
/// deposit has been withdrawn — the record doubles as proof the account has
/// staked before, and its id counter keeps growing monotonically.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UserInfo {
    /// Sum of `amount` across all of this staker's deposit slots.
    pub total_amount: u128,

    /// Next deposit id to hand out. Ids below this are allocated slots.
    pub next_deposit_id: DepositId,

    /// Deposit slots keyed by id. Slots persist after full withdrawal
    /// with `amount = 0` and may be re-used by a later top-up.
    pub deposits: HashMap<DepositId, DepositInfo>,
}

impl UserInfo {
    pub fn deposit(&self, id: DepositId) -> Option<&DepositInfo> {
        self.deposits.get(&id)
    }

    pub fn deposit_mut(&mut self, id: DepositId) -> Option<&mut DepositInfo> {
        self.deposits.get_mut(&id)
    }

    /// Allocate a fresh, empty deposit slot and return its id.
    pub fn allocate_slot(&mut self) -> DepositId {
        let id = self.next_deposit_id;
        self.next_deposit_id += 1;
        self.deposits.insert(id, DepositInfo::default());
        id
    }
}

/// One deposit slot: locked principal plus its reward bookkeeping.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DepositInfo {
    /// Staked principal currently in this slot, raw units.
    pub amount: u128,

    /// When the slot was last deposited into. A top-up moves this forward.
    pub lock_from: Timestamp,

    /// When the principal unlocks: `lock_from + lock_duration`.
    pub lock_to: Timestamp,

    /// The share of `amount * acc_token_per_share / ACC_PRECISION` already
    /// settled, so only accrual since the last touch counts as new reward.
    pub reward_debt: u128,

    /// Reward settled but not yet paid out.
    pub reward_pending: u128,
}

impl Default for DepositInfo {
    fn default() -> Self {
        Self {
            amount: 0,
            lock_from: Timestamp::EPOCH,
            lock_to: Timestamp::EPOCH,
            reward_debt: 0,
            reward_pending: 0,
        }
    }
}

impl DepositInfo {
    /// Whether the principal is still locked at `now`.
    pub fn is_locked(&self, now: Timestamp) -> bool {
        now < self.lock_to
    }

    /// Reward accrued since the slot was last settled, at accumulator `acc`.
    ///
    /// Returns `None` on arithmetic overflow.
    pub fn unsettled(&self, acc: u128) -> Option<u128> {
        let settled = self.amount.checked_mul(acc)? / ACC_PRECISION;
        settled.checked_sub(self.reward_debt)
    }

    /// Total reward owed at accumulator `acc`: settled pending plus accrual
    /// since the last touch.
    pub fn pending_total(&self, acc: u128) -> Option<u128> {
        self.reward_pending.checked_add(self.unsettled(acc)?)
    }
}
