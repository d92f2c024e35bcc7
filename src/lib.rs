//! # quantum-collab: Experiment Scheduler + Token Ledger Contracts
//!
//! Two on-chain modules executed inside a deterministic, transaction-serialized
//! ledger runtime:
//!
//! - **Experiment Scheduler** (`experiment-scheduler`): coordinates time-boxed
//!   collaborative experiments through an access-controlled, forward-only
//!   lifecycle.
//! - **Token Ledger** (`quantum-token`): fungible-asset accounting used to fund
//!   and reward experiments, with `total_supply == Σ balances` at every
//!   observable point.
//!
//! ## Design Principles
//!
//! - **All-or-nothing calls**: every precondition is checked before the first
//!   write, so a failed call is indistinguishable from one that never ran
//! - **Explicit state**: stores are values threaded through `&mut self`, never
//!   globals
//! - **Closed lifecycle**: status changes go through a single transition table
//! - **One guard**: identity checks go through [`auth::authorize`]
//!
//! ## Example Usage
//!
//! ```rust
//! use quantum_collab::Runtime;
//! use quantum_collab::auth::Identity;
//! use serde_json::json;
//!
//! let owner = Identity::from("ST1OWNER");
//! let mut runtime = Runtime::builder(owner.clone()).build()?;
//!
//! let id = runtime.call(
//!     &owner,
//!     "experiment-scheduler",
//!     "schedule-experiment",
//!     &[json!("Quantum Teleportation"), json!("100km link"), json!(1_625_097_600_000_i64),
//!       json!(3600), json!(["ST1OWNER", "ST2PEER"])],
//! )?;
//! assert_eq!(id, json!(1));
//!
//! runtime.call(&owner, "quantum-token", "mint", &[json!(100), json!("ST2PEER")])?;
//! assert_eq!(
//!     runtime.call(&owner, "quantum-token", "get-balance", &[json!("ST2PEER")])?,
//!     json!(100)
//! );
//! # Ok::<(), quantum_collab::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod auth;
pub mod config;
pub mod error;
pub mod event;
pub mod kv;
pub mod runtime;
pub mod scheduler;
pub mod snapshot;
pub mod token;

pub use error::{Error, Result};
pub use runtime::{Runtime, RuntimeBuilder};
