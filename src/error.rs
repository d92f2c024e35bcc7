//! Error types for quantum-collab
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)
//!
//! Every failure is detected before any store mutation, so an `Err` always
//! means the call had no observable effect.

use thiserror::Error;

use crate::scheduler::ExperimentStatus;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Contract error types
#[derive(Error, Debug)]
pub enum Error {
    /// Caller lacks the identity required by the operation
    #[error("Unauthorized")]
    Unauthorized,

    /// Operation not valid for the experiment's current lifecycle state
    #[error("Invalid experiment status: experiment {id} is {status}")]
    InvalidStatus {
        /// Experiment id
        id: u64,
        /// Status at the time of the call
        status: ExperimentStatus,
    },

    /// Transfer exceeds the sender's balance
    #[error("Insufficient balance: have {balance}, need {requested}")]
    InsufficientBalance {
        /// Sender balance at the time of the call
        balance: u128,
        /// Requested transfer amount
        requested: u128,
    },

    /// Zero amount, empty required field, malformed argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Referenced id or account absent where presence is required
    #[error("Not found: {0}")]
    NotFound(String),

    /// Balance or supply would exceed `u128::MAX`
    #[error("Arithmetic overflow: balance or supply exceeds u128::MAX")]
    Overflow,

    /// Call addressed to a contract that is not deployed
    #[error("Unknown contract: {0}")]
    UnknownContract(String),

    /// Call addressed to an operation the contract does not expose
    #[error("Unknown operation: {contract}.{operation}")]
    UnknownOperation {
        /// Contract name
        contract: String,
        /// Operation name
        operation: String,
    },

    /// Persisted state is missing or inconsistent
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON encoding/decoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Stable numeric code, mirroring on-chain `(err uN)` responses.
    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::Unauthorized => 100,
            Self::InvalidStatus { .. } => 101,
            Self::InsufficientBalance { .. } => 102,
            Self::InvalidInput(_) => 103,
            Self::NotFound(_) => 104,
            Self::Overflow => 105,
            Self::UnknownContract(_) => 110,
            Self::UnknownOperation { .. } => 111,
            Self::Storage(_) => 120,
            Self::Serialization(_) => 121,
        }
    }
}
