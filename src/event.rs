//! Contract events
//!
//! One event per successful mutation, appended after the mutation commits.
//! Failed calls never emit.

use serde::{Deserialize, Serialize};

use crate::auth::Identity;

/// Observable record of a committed state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ContractEvent {
    /// New tokens credited to `recipient`.
    Minted {
        /// Credited account
        recipient: Identity,
        /// Amount created
        amount: u128,
    },
    /// Tokens moved between accounts.
    Transferred {
        /// Debited account
        sender: Identity,
        /// Credited account
        recipient: Identity,
        /// Amount moved
        amount: u128,
    },
    /// Token metadata URI replaced.
    TokenUriUpdated {
        /// New URI
        uri: String,
    },
    /// Experiment registered in `Scheduled` state.
    ExperimentScheduled {
        /// Assigned id
        id: u64,
        /// Scheduling caller
        creator: Identity,
    },
    /// Experiment moved to `InProgress`.
    ExperimentStarted {
        /// Experiment id
        id: u64,
    },
    /// Experiment moved to `Completed`.
    ExperimentCompleted {
        /// Experiment id
        id: u64,
        /// Completing caller
        by: Identity,
    },
}

/// Append-only event journal owned by a single contract.
///
/// Unbounded: entries stay until [`EventLog::drain`] takes them.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<ContractEvent>,
}

impl EventLog {
    /// Record a committed event.
    pub fn emit(&mut self, event: ContractEvent) {
        self.events.push(event);
    }

    /// Events recorded since the last drain, oldest first.
    #[must_use]
    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Take all pending events, leaving the journal empty.
    pub fn drain(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }
}
