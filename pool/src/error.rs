//! Pool-specific errors.

use crate::state::DepositId;
use harvest_ledger::LedgerError;
use harvest_types::Timestamp;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("invalid pool parameters: {0}")]
    InvalidParams(String),

    #[error("amount must be non-zero")]
    InvalidAmount,

    #[error("deposits are frozen while the pool is paused")]
    DepositFrozen,

    #[error("withdrawals are frozen while the pool is paused")]
    WithdrawFrozen,

    #[error("time {0} is outside the mining window")]
    InvalidTime(Timestamp),

    #[error("deposit {0} not found")]
    DepositNotFound(DepositId),

    #[error("withdraw amount too high: requested {requested}, deposited {available}")]
    AmountTooHigh { requested: u128, available: u128 },

    #[error("deposit is locked until {unlock_at}")]
    InvalidTimeToWithdraw { unlock_at: Timestamp },

    #[error("insufficient reward supply: need {needed}, available {available}")]
    InsufficientRewardSupply { needed: u128, available: u128 },

    #[error("arithmetic overflow in reward computation")]
    Overflow,

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
