//! Staking pool — time-locked deposits earning a continuously distributed
//! reward token.
//!
//! Reward accounting is accumulated-per-share:
//! `acc_token_per_share += Δt × reward_per_second × ACC_PRECISION / total_staking`
//! over the mining window, and each deposit owes
//! `amount × acc_token_per_share / ACC_PRECISION − reward_debt` since its
//! last touch.
//!
//! This crate handles:
//! - Pool accrual (`update_pool`, window-clipped multiplier)
//! - Deposit lifecycle with per-slot lock enforcement
//! - Withdrawal with quantized reward payout
//! - Admin controls (pause, reward supply top-up)

pub mod engine;
pub mod error;
pub mod state;

pub use engine::{PoolSummary, StakingPool, POOL_ACCOUNT};
pub use error::PoolError;
pub use state::{DepositId, DepositInfo, UserInfo, ACC_PRECISION};
