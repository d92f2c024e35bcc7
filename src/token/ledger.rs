//! Ledger Store - identity → balance mapping plus total supply
//!
//! Conservation: `total_supply == Σ balances` after every public method.
//! Mutating methods compute every new value first (checked arithmetic) and
//! write only once all of them are known to be valid.

use rustc_hash::FxHashMap;

use crate::auth::Identity;
use crate::{Error, Result};

/// Authoritative balances and supply counter.
#[derive(Debug, Default, Clone)]
pub struct LedgerStore {
    balances: FxHashMap<Identity, u128>,
    total_supply: u128,
}

impl LedgerStore {
    /// Create an empty ledger (no accounts, zero supply).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `account`, zero if never credited.
    #[must_use]
    pub fn balance_of(&self, account: &Identity) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Sum of all balances.
    #[must_use]
    pub const fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Number of accounts ever credited.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.balances.len()
    }

    /// Iterate over `(account, balance)` pairs in unspecified order.
    pub fn accounts(&self) -> impl Iterator<Item = (&Identity, u128)> {
        self.balances.iter().map(|(id, bal)| (id, *bal))
    }

    /// Create `amount` new units in `recipient`'s account.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a zero amount and
    /// [`Error::Overflow`] if the balance or supply would wrap.
    pub fn credit_new(&mut self, recipient: &Identity, amount: u128) -> Result<()> {
        if amount == 0 {
            return Err(Error::InvalidInput("amount must be positive".to_string()));
        }
        let new_supply = self.total_supply.checked_add(amount).ok_or(Error::Overflow)?;
        let new_balance = self
            .balance_of(recipient)
            .checked_add(amount)
            .ok_or(Error::Overflow)?;

        self.total_supply = new_supply;
        self.balances.insert(recipient.clone(), new_balance);
        Ok(())
    }

    /// Move `amount` from `sender` to `recipient`; supply is unchanged.
    ///
    /// A self-transfer still requires `balance(sender) >= amount`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a zero amount,
    /// [`Error::InsufficientBalance`] if the sender cannot cover it, and
    /// [`Error::Overflow`] if the recipient balance would wrap.
    pub fn move_balance(
        &mut self,
        sender: &Identity,
        recipient: &Identity,
        amount: u128,
    ) -> Result<()> {
        if amount == 0 {
            return Err(Error::InvalidInput("amount must be positive".to_string()));
        }
        let sender_balance = self.balance_of(sender);
        let new_sender = sender_balance
            .checked_sub(amount)
            .ok_or(Error::InsufficientBalance {
                balance: sender_balance,
                requested: amount,
            })?;

        if sender == recipient {
            return Ok(());
        }

        let new_recipient = self
            .balance_of(recipient)
            .checked_add(amount)
            .ok_or(Error::Overflow)?;

        self.balances.insert(sender.clone(), new_sender);
        self.balances.insert(recipient.clone(), new_recipient);
        Ok(())
    }

    /// Rebuild a ledger from persisted balances, checking conservation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the balances do not sum to
    /// `total_supply`, or [`Error::Overflow`] if the sum wraps.
    pub fn from_parts(
        balances: impl IntoIterator<Item = (Identity, u128)>,
        total_supply: u128,
    ) -> Result<Self> {
        let mut map = FxHashMap::default();
        let mut sum: u128 = 0;
        for (account, balance) in balances {
            sum = sum.checked_add(balance).ok_or(Error::Overflow)?;
            map.insert(account, balance);
        }
        if sum != total_supply {
            return Err(Error::Storage(format!(
                "balances sum to {sum} but total supply is {total_supply}"
            )));
        }
        Ok(Self {
            balances: map,
            total_supply,
        })
    }
}
