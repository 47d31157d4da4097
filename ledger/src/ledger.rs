//! In-memory fungible token ledger.

use crate::error::LedgerError;
use harvest_types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-account balances for a single token.
///
/// Balances are u128 raw units. Total supply grows only through [`mint`];
/// [`transfer`] conserves it. Every balance stays bounded by the total
/// supply, so balance arithmetic cannot overflow once the supply check
/// passes.
///
/// [`mint`]: TokenLedger::mint
/// [`transfer`]: TokenLedger::transfer
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TokenLedger {
    balances: HashMap<AccountId, u128>,
    total_supply: u128,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of an account. Unknown accounts read as zero.
    pub fn balance_of(&self, account: &AccountId) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Sum of all balances on this ledger.
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Create `amount` new tokens in `account`'s balance.
    pub fn mint(&mut self, account: &AccountId, amount: u128) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow)?;
        *self.balances.entry(account.clone()).or_insert(0) += amount;
        self.total_supply = supply;
        Ok(())
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// A self-transfer is validated like any other transfer and leaves
    /// balances unchanged.
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        if let Some(balance) = self.balances.get_mut(from) {
            *balance -= amount;
        }
        *self.balances.entry(to.clone()).or_insert(0) += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_account(n: u8) -> AccountId {
        AccountId::new(format!("acct_{n:03}"))
    }

    #[test]
    fn mint_zero_amount_is_rejected() {
        let mut ledger = TokenLedger::new();
        let result = ledger.mint(&test_account(1), 0);
        assert!(matches!(result.unwrap_err(), LedgerError::InvalidAmount));
        assert_eq!(ledger.total_supply(), 0);
    }

    #[test]
    fn mint_credits_and_grows_supply() {
        let mut ledger = TokenLedger::new();
        ledger.mint(&test_account(1), 1000).unwrap();
        ledger.mint(&test_account(1), 500).unwrap();
        ledger.mint(&test_account(2), 250).unwrap();

        assert_eq!(ledger.balance_of(&test_account(1)), 1500);
        assert_eq!(ledger.balance_of(&test_account(2)), 250);
        assert_eq!(ledger.total_supply(), 1750);
    }

    #[test]
    fn unknown_account_reads_zero() {
        let ledger = TokenLedger::new();
        assert_eq!(ledger.balance_of(&test_account(9)), 0);
    }

    #[test]
    fn transfer_zero_amount_is_rejected() {
        let mut ledger = TokenLedger::new();
        ledger.mint(&test_account(1), 1000).unwrap();
        let result = ledger.transfer(&test_account(1), &test_account(2), 0);
        assert!(matches!(result.unwrap_err(), LedgerError::InvalidAmount));
    }

    #[test]
    fn transfer_beyond_balance_is_rejected() {
        let mut ledger = TokenLedger::new();
        ledger.mint(&test_account(1), 100).unwrap();
        let result = ledger.transfer(&test_account(1), &test_account(2), 101);
        match result.unwrap_err() {
            LedgerError::InsufficientBalance { needed, available } => {
                assert_eq!(needed, 101);
                assert_eq!(available, 100);
            }
            other => panic!("expected InsufficientBalance, got {other:?}"),
        }
        assert_eq!(ledger.balance_of(&test_account(1)), 100);
        assert_eq!(ledger.balance_of(&test_account(2)), 0);
    }

    #[test]
    fn transfer_from_unknown_account_is_rejected() {
        let mut ledger = TokenLedger::new();
        let result = ledger.transfer(&test_account(1), &test_account(2), 1);
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::InsufficientBalance { available: 0, .. }
        ));
    }

    #[test]
    fn transfer_moves_balance_and_conserves_supply() {
        let mut ledger = TokenLedger::new();
        ledger.mint(&test_account(1), 1000).unwrap();
        ledger.transfer(&test_account(1), &test_account(2), 400).unwrap();

        assert_eq!(ledger.balance_of(&test_account(1)), 600);
        assert_eq!(ledger.balance_of(&test_account(2)), 400);
        assert_eq!(ledger.total_supply(), 1000);
    }

    #[test]
    fn self_transfer_succeeds_when_funded() {
        let mut ledger = TokenLedger::new();
        ledger.mint(&test_account(1), 100).unwrap();
        ledger.transfer(&test_account(1), &test_account(1), 100).unwrap();
        assert_eq!(ledger.balance_of(&test_account(1)), 100);
        assert_eq!(ledger.total_supply(), 100);

        let result = ledger.transfer(&test_account(1), &test_account(1), 101);
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::InsufficientBalance { .. }
        ));
    }
}
