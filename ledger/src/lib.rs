//! Token ledger for the harvest staking pool.
//!
//! A minimal balance map: mint creates supply, transfer moves it. The
//! staking pool consumes two of these — one for the staked token and one
//! for the reward token.

pub mod error;
pub mod ledger;

pub use error::LedgerError;
pub use ledger::TokenLedger;
