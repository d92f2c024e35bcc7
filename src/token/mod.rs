//! Token Contract (`quantum-token`)
//!
//! Fungible-asset accounting used to fund and reward experiments.
//!
//! ## Operations
//!
//! | Operation | Gate | Failure modes |
//! |---|---|---|
//! | `mint` | owner | `Unauthorized`, `InvalidInput`, `Overflow` |
//! | `transfer` | caller == sender | `Unauthorized`, `InvalidInput`, `InsufficientBalance`, `Overflow` |
//! | `set_token_uri` | owner | `Unauthorized`, `InvalidInput` |
//! | queries | none | never fail |
//!
//! ```rust
//! use quantum_collab::auth::Identity;
//! use quantum_collab::config::DeployConfig;
//! use quantum_collab::token::TokenContract;
//!
//! let owner = Identity::from("ST1OWNER");
//! let alice = Identity::from("ST2ALICE");
//! let mut token = TokenContract::deploy(&DeployConfig::new(owner.clone()));
//!
//! token.mint(&owner, 100, &alice)?;
//! assert_eq!(token.get_balance(&alice), 100);
//! assert_eq!(token.total_supply(), 100);
//! # Ok::<(), quantum_collab::Error>(())
//! ```

mod ledger;

pub use ledger::LedgerStore;

use tracing::debug;

use crate::auth::{ensure_authorized, Identity};
use crate::config::{DeployConfig, TokenMetadata};
use crate::event::{ContractEvent, EventLog};
use crate::{Error, Result};

/// Contract name on the call surface.
pub const CONTRACT_NAME: &str = "quantum-token";

/// Token contract state: ledger, owner, metadata and event journal.
#[derive(Debug, Clone)]
pub struct TokenContract {
    owner: Identity,
    ledger: LedgerStore,
    metadata: TokenMetadata,
    token_uri_max_len: usize,
    events: EventLog,
}

impl TokenContract {
    /// Deploy with an empty ledger; `config.owner` becomes the immutable owner.
    #[must_use]
    pub fn deploy(config: &DeployConfig) -> Self {
        Self {
            owner: config.owner.clone(),
            ledger: LedgerStore::new(),
            metadata: config.token.clone(),
            token_uri_max_len: config.token_uri_max_len,
            events: EventLog::default(),
        }
    }

    /// Rehydrate from persisted parts (see [`crate::snapshot`]).
    pub(crate) fn from_parts(
        owner: Identity,
        ledger: LedgerStore,
        metadata: TokenMetadata,
        token_uri_max_len: usize,
    ) -> Self {
        Self {
            owner,
            ledger,
            metadata,
            token_uri_max_len,
            events: EventLog::default(),
        }
    }

    /// Create `amount` tokens for `recipient`. Owner only.
    ///
    /// # Errors
    ///
    /// [`Error::Unauthorized`] unless `caller` is the owner,
    /// [`Error::InvalidInput`] for a zero amount, [`Error::Overflow`] if the
    /// supply would wrap.
    pub fn mint(&mut self, caller: &Identity, amount: u128, recipient: &Identity) -> Result<bool> {
        ensure_authorized(caller, &self.owner)?;
        self.ledger.credit_new(recipient, amount)?;

        debug!(%recipient, amount, supply = self.ledger.total_supply(), "minted");
        self.events.emit(ContractEvent::Minted {
            recipient: recipient.clone(),
            amount,
        });
        Ok(true)
    }

    /// Move `amount` from `sender` to `recipient`. Only `sender` may call it.
    ///
    /// # Errors
    ///
    /// [`Error::Unauthorized`] unless `caller == sender`,
    /// [`Error::InvalidInput`] for a zero amount,
    /// [`Error::InsufficientBalance`] if `sender` cannot cover `amount`,
    /// [`Error::Overflow`] if the recipient balance would wrap.
    pub fn transfer(
        &mut self,
        caller: &Identity,
        amount: u128,
        sender: &Identity,
        recipient: &Identity,
    ) -> Result<bool> {
        ensure_authorized(caller, sender)?;
        self.ledger.move_balance(sender, recipient, amount)?;

        debug!(%sender, %recipient, amount, "transferred");
        self.events.emit(ContractEvent::Transferred {
            sender: sender.clone(),
            recipient: recipient.clone(),
            amount,
        });
        Ok(true)
    }

    /// Balance of `account`, zero if it has never been credited.
    #[must_use]
    pub fn get_balance(&self, account: &Identity) -> u128 {
        self.ledger.balance_of(account)
    }

    /// Replace the metadata URI. Owner only.
    ///
    /// # Errors
    ///
    /// [`Error::Unauthorized`] unless `caller` is the owner,
    /// [`Error::InvalidInput`] if `uri` exceeds the configured length.
    pub fn set_token_uri(&mut self, caller: &Identity, uri: impl Into<String>) -> Result<bool> {
        ensure_authorized(caller, &self.owner)?;
        let uri = uri.into();
        if uri.len() > self.token_uri_max_len {
            return Err(Error::InvalidInput(format!(
                "token URI exceeds {} bytes",
                self.token_uri_max_len
            )));
        }

        debug!(%uri, "token uri updated");
        self.metadata.token_uri.clone_from(&uri);
        self.events.emit(ContractEvent::TokenUriUpdated { uri });
        Ok(true)
    }

    /// Current metadata URI.
    #[must_use]
    pub fn get_token_uri(&self) -> &str {
        &self.metadata.token_uri
    }

    /// Token display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Token ticker symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    /// Display decimals.
    #[must_use]
    pub const fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    /// Sum of all balances.
    #[must_use]
    pub const fn total_supply(&self) -> u128 {
        self.ledger.total_supply()
    }

    /// Deployment owner.
    #[must_use]
    pub const fn owner(&self) -> &Identity {
        &self.owner
    }

    pub(crate) const fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    /// Read-only view of the ledger.
    #[must_use]
    pub const fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    /// Pending events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[ContractEvent] {
        self.events.events()
    }

    /// Take all pending events.
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        self.events.drain()
    }
}
