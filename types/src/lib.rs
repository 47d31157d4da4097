//! Fundamental types for the harvest staking pool.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: account ids, timestamps, token amounts, and pool parameters.

pub mod account;
pub mod amount;
pub mod params;
pub mod time;

pub use account::AccountId;
pub use amount::{format_tokens, tokens, TOKEN_UNIT};
pub use params::PoolParams;
pub use time::Timestamp;
