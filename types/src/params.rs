//! Pool schedule parameters.

use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// The reward schedule and lock policy for a staking pool.
///
/// Fixed at pool construction; the mining window `[start_time, end_time]`
/// is the only interval during which reward accrues, and every deposit is
/// locked for `lock_duration_secs` from the moment it (last) lands.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoolParams {
    /// Reward tokens distributed per second, in raw units.
    pub reward_per_second: u128,

    /// When pool mining starts (inclusive).
    pub start_time: Timestamp,

    /// When pool mining ends (inclusive).
    pub end_time: Timestamp,

    /// Locking duration in seconds applied to each deposit slot.
    pub lock_duration_secs: u64,
}

impl PoolParams {
    /// Whether `t` falls inside the mining window (boundaries included).
    pub fn contains(&self, t: Timestamp) -> bool {
        self.start_time <= t && t <= self.end_time
    }

    /// The lock expiry for a deposit made (or topped up) at `from`.
    pub fn lock_expiry(&self, from: Timestamp) -> Timestamp {
        from.saturating_add_secs(self.lock_duration_secs)
    }
}
