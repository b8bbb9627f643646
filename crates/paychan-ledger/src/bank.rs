//! Balance ledger seam and a store-backed implementation.

use paychan_core::{Address, Coins};
use std::sync::Arc;

use crate::error::BankError;
use crate::store::{get_json, set_json, KvStore};

/// Authoritative account balances.
///
/// Each call is atomic: on error the account is left unchanged.
pub trait Bank: Send + Sync {
    /// Current balance of `account` (empty if unknown).
    fn balance(&self, account: &Address) -> Result<Coins, BankError>;

    /// Debit `amount`, failing with `InsufficientFunds` if any denomination
    /// would go negative. Returns the new balance.
    fn subtract(&self, account: &Address, amount: &Coins) -> Result<Coins, BankError>;

    /// Credit `amount`. Returns the new balance.
    fn add(&self, account: &Address, amount: &Coins) -> Result<Coins, BankError>;
}

/// Balances persisted as JSON under `balance:{address}`.
pub struct StoreBank {
    store: Arc<dyn KvStore>,
}

impl StoreBank {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    fn balance_key(account: &Address) -> Vec<u8> {
        format!("balance:{}", account.to_hex()).into_bytes()
    }

    fn set_balance(&self, account: &Address, balance: &Coins) -> Result<(), BankError> {
        let key = Self::balance_key(account);
        if balance.is_empty() {
            self.store.delete(&key)?;
        } else {
            set_json(self.store.as_ref(), &key, balance)?;
        }
        Ok(())
    }

    fn check_amount(amount: &Coins) -> Result<(), BankError> {
        if !amount.is_valid() || amount.is_any_negative() {
            return Err(BankError::InvalidAmount(amount.to_string()));
        }
        Ok(())
    }
}

impl Bank for StoreBank {
    fn balance(&self, account: &Address) -> Result<Coins, BankError> {
        Ok(get_json::<Coins>(self.store.as_ref(), &Self::balance_key(account))?.unwrap_or_default())
    }

    fn subtract(&self, account: &Address, amount: &Coins) -> Result<Coins, BankError> {
        Self::check_amount(amount)?;
        let available = self.balance(account)?;
        let remaining = available.checked_sub(amount)?;
        if remaining.is_any_negative() {
            return Err(BankError::InsufficientFunds {
                account: account.to_hex(),
                available: available.to_string(),
                required: amount.to_string(),
            });
        }
        self.set_balance(account, &remaining)?;
        tracing::debug!(account = %account, amount = %amount, "debited account");
        Ok(remaining)
    }

    fn add(&self, account: &Address, amount: &Coins) -> Result<Coins, BankError> {
        Self::check_amount(amount)?;
        let balance = self.balance(account)?.checked_add(amount)?;
        self.set_balance(account, &balance)?;
        tracing::debug!(account = %account, amount = %amount, "credited account");
        Ok(balance)
    }
}
